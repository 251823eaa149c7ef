//! Mapping from source records to EARS cells.
//!
//! This module contains the pieces that turn a [`ShiftAssignment`](crate::models::ShiftAssignment)
//! into cell writes: expanding schedules into half-day slots, resolving each
//! slot's date to a monthly sheet, finding the trainee's rows on that sheet,
//! computing the target cell, and classifying the rotation into a presence code.

mod cell_address;
mod date_sheet;
mod name_index;
mod rotation;
mod shift_expansion;

pub use cell_address::CellAddressMapper;
pub use date_sheet::{DateSheetResolver, MonthlySheet, find_overlaps, month_number};
pub use name_index::{NameDirectory, NameRowIndex, lookup_key};
pub use rotation::{classify_optional, classify_rotation};
pub use shift_expansion::{Expansion, expand, expand_block, expand_timed, preferred};
