//! Expansion of schedules into half-day slots.
//!
//! Block schedules cover both halves of every day in their range. Timed shifts
//! are classified by their recorded length: a short shift covers the half-day it
//! starts in, a long shift covers two consecutive halves, which for an evening
//! start means the PM half of the start date and the AM half of the next day.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;

use crate::config::ShiftBands;
use crate::models::{Schedule, ShiftHalf, ShiftSlot};

/// The outcome of expanding one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// The schedule covers these slots, in chronological order.
    Covered(Vec<ShiftSlot>),
    /// A zero-length shift; nothing to write and nothing to report.
    Skipped,
    /// The recorded length falls outside every band.
    Unrecognized {
        /// The recorded length.
        hours: Decimal,
        /// When the shift starts.
        start: NaiveDateTime,
    },
}

impl Expansion {
    /// Returns the covered slots, or an empty slice.
    pub fn slots(&self) -> &[ShiftSlot] {
        match self {
            Expansion::Covered(slots) => slots,
            _ => &[],
        }
    }
}

/// Expands an inclusive date range into AM and PM slots for every day.
///
/// Returns no slots when `end` is before `start`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use ears_fill::mapping::expand_block;
///
/// let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 7, 3).unwrap();
/// assert_eq!(expand_block(start, end).len(), 6);
/// ```
pub fn expand_block(start: NaiveDate, end: NaiveDate) -> Vec<ShiftSlot> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .flat_map(|date| {
            [
                ShiftSlot::new(date, ShiftHalf::Am),
                ShiftSlot::new(date, ShiftHalf::Pm),
            ]
        })
        .collect()
}

/// Expands a timed shift by its recorded length.
///
/// | Length                                   | Slots                                    |
/// |------------------------------------------|------------------------------------------|
/// | `0`                                      | none (skipped)                           |
/// | `(0, single_max_hours)`                  | the half the shift starts in             |
/// | `[double_min_hours, double_max_hours]`   | start AM → AM + PM; start PM → PM + next AM |
/// | anything else                            | unrecognized                             |
pub fn expand_timed(start: NaiveDateTime, hours: Decimal, bands: &ShiftBands) -> Expansion {
    if hours.is_zero() {
        return Expansion::Skipped;
    }

    let date = start.date();
    let starts_in_morning = start.hour() < bands.afternoon_hour;

    if hours > Decimal::ZERO && hours < bands.single_max_hours {
        let half = if starts_in_morning {
            ShiftHalf::Am
        } else {
            ShiftHalf::Pm
        };
        return Expansion::Covered(vec![ShiftSlot::new(date, half)]);
    }

    if hours >= bands.double_min_hours && hours <= bands.double_max_hours {
        if starts_in_morning {
            return Expansion::Covered(vec![
                ShiftSlot::new(date, ShiftHalf::Am),
                ShiftSlot::new(date, ShiftHalf::Pm),
            ]);
        }
        if let Some(next) = date.succ_opt() {
            return Expansion::Covered(vec![
                ShiftSlot::new(date, ShiftHalf::Pm),
                ShiftSlot::new(next, ShiftHalf::Am),
            ]);
        }
    }

    Expansion::Unrecognized { hours, start }
}

/// Expands any schedule.
pub fn expand(schedule: &Schedule, bands: &ShiftBands) -> Expansion {
    match schedule {
        Schedule::Block { start, end } => Expansion::Covered(expand_block(*start, *end)),
        Schedule::Timed { start, hours, .. } => expand_timed(*start, *hours, bands),
        Schedule::Slot(slot) => Expansion::Covered(vec![*slot]),
    }
}

/// Picks between a projected and an actual value.
///
/// The actual value wins when it is present and differs from the projection;
/// otherwise the projection stands.
pub fn preferred<T: PartialEq>(projected: Option<T>, actual: Option<T>) -> Option<T> {
    match actual {
        Some(actual) if projected.as_ref() != Some(&actual) => Some(actual),
        _ => projected,
    }
}
