//! Timed-shift schedules: one row per shift.
//!
//! Start and end instants come in projected/actual pairs; the actual value is
//! used when it is recorded and differs from the projection. The shift length
//! is taken from the recorded hours column, not from the instants.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::config::TimedColumns;
use crate::mapping::preferred;
use crate::models::{CellValue, Diagnostic, Schedule, ShiftAssignment, format_trainee_name};

use super::{SourceBatch, SourceSheet};

fn hours_value(value: &CellValue) -> Option<Decimal> {
    match value {
        CellValue::Number(n) => Decimal::try_from(*n).ok().map(|d| d.round_dp(4)),
        CellValue::Text(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Reads every shift row of `sheet`.
pub fn read(sheet: &SourceSheet, columns: &TimedColumns) -> SourceBatch {
    let mut batch = SourceBatch::default();
    let mut row = columns.first_row;

    while let Some(last) = sheet.text(row, columns.last_name) {
        let first = sheet.text(row, columns.first_name).unwrap_or_default();
        let trainee = format_trainee_name(&last, &first);

        let start = preferred(
            sheet.value(row, columns.projected_start).as_datetime(),
            sheet.value(row, columns.actual_start).as_datetime(),
        );
        let end = preferred(
            sheet.value(row, columns.projected_end).as_datetime(),
            sheet.value(row, columns.actual_end).as_datetime(),
        );
        let hours = hours_value(sheet.value(row, columns.hours));

        match (start, hours) {
            (Some(start), Some(hours)) => batch.assignments.push(ShiftAssignment {
                trainee,
                schedule: Schedule::Timed { start, end, hours },
                rotation: sheet.text(row, columns.rotation),
                source_row: Some(row),
            }),
            (None, _) => batch.diagnostics.push(Diagnostic::malformed_row(
                &sheet.name,
                row,
                format!("missing start time for {}", trainee),
            )),
            (_, None) => batch.diagnostics.push(Diagnostic::malformed_row(
                &sheet.name,
                row,
                format!("missing shift hours for {}", trainee),
            )),
        }
        row += 1;
    }

    batch
}
