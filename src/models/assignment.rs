//! Shift assignment model and related types.
//!
//! A [`ShiftAssignment`] is one record read from a source schedule: who, when, and
//! which rotation. Assignments are ephemeral; they are read once per run.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Half of a day on the attendance grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShiftHalf {
    /// Morning shift, written on the trainee's anchor row.
    Am,
    /// Afternoon/evening shift, written on the row below the anchor.
    Pm,
}

impl fmt::Display for ShiftHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftHalf::Am => write!(f, "AM"),
            ShiftHalf::Pm => write!(f, "PM"),
        }
    }
}

/// A single (date, half-day) cell on the attendance grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftSlot {
    /// The calendar date.
    pub date: NaiveDate,
    /// AM or PM.
    pub half: ShiftHalf,
}

impl ShiftSlot {
    /// Creates a new slot.
    pub fn new(date: NaiveDate, half: ShiftHalf) -> Self {
        Self { date, half }
    }
}

impl fmt::Display for ShiftSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.half)
    }
}

/// When an assignment happens, in the shape its source schedule records it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    /// Full days from `start` to `end` inclusive, both halves of each day.
    Block {
        /// First covered date.
        start: NaiveDate,
        /// Last covered date.
        end: NaiveDate,
    },
    /// A single timed shift whose coverage is decided by its recorded length.
    Timed {
        /// When the shift starts.
        start: NaiveDateTime,
        /// When the shift ends, if recorded.
        end: Option<NaiveDateTime>,
        /// The recorded shift length in hours.
        hours: Decimal,
    },
    /// Exactly one half-day, already decided by the source grid.
    Slot(ShiftSlot),
}

/// One source record to copy into the EARS workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    /// Trainee display name, "Last, First", possibly with a "(qualifier)" suffix.
    pub trainee: String,
    /// When the assignment happens.
    pub schedule: Schedule,
    /// Free-text rotation description, when the source has one.
    pub rotation: Option<String>,
    /// The source row the record came from, for diagnostics.
    pub source_row: Option<u32>,
}

/// Joins a last and first name into the "Last, First" display form.
///
/// # Example
///
/// ```
/// use ears_fill::models::format_trainee_name;
///
/// assert_eq!(format_trainee_name("Doe", "John"), "Doe, John");
/// ```
pub fn format_trainee_name(last: &str, first: &str) -> String {
    format!("{}, {}", last.trim(), first.trim())
}
