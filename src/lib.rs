//! EARS attendance filler.
//!
//! This crate copies trainee schedules (block rotations, timed shifts and clinic
//! grids) into the monthly AM/PM attendance grids of an EARS workbook, writing
//! "P" for present and "PTO" for paid time off, and reports every record it
//! could not place.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod mapping;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod store;
