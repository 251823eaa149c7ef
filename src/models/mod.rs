//! Core data models for the EARS fill engine.
//!
//! This module contains the domain models shared by the sources, the mapping
//! logic and the workbook stores.

mod assignment;
mod cell;
mod presence;
mod report;

pub use assignment::{Schedule, ShiftAssignment, ShiftHalf, ShiftSlot, format_trainee_name};
pub use cell::{
    CellRef, CellValue, column_letters, datetime_to_excel_serial, excel_serial_to_datetime,
};
pub use presence::PresenceCode;
pub use report::{Diagnostic, DiagnosticKind, RunReport};
