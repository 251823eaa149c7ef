//! Clinic grids: dates across a header row, two rows per trainee (AM then PM),
//! and a non-blank cell wherever the trainee is booked.

use crate::config::ClinicGridLayout;
use crate::models::{Diagnostic, Schedule, ShiftAssignment, ShiftHalf, ShiftSlot};

use super::{SourceBatch, SourceSheet};

/// Returns the last trainee row (the PM row of the last named trainee).
///
/// Names sit every other row from `first_row`; the table ends at the first
/// blank name.
fn last_row(sheet: &SourceSheet, layout: &ClinicGridLayout) -> Option<u32> {
    let mut row = layout.first_row;
    while !sheet.is_blank(row, layout.name_column) {
        row += 2;
    }
    (row > layout.first_row).then(|| row - 1)
}

/// Returns the last date column. A single blank header between dates does not
/// end the table.
fn last_column(sheet: &SourceSheet, layout: &ClinicGridLayout) -> u32 {
    let header = layout.header_row;
    let mut column = layout.first_date_column;
    while !sheet.is_blank(header, column) || !sheet.is_blank(header, column + 1) {
        column += 1;
    }
    column
}

/// Reads every booked cell of `sheet`.
pub fn read(sheet: &SourceSheet, layout: &ClinicGridLayout) -> SourceBatch {
    let mut batch = SourceBatch::default();
    let Some(last_row) = last_row(sheet, layout) else {
        return batch;
    };
    let last_column = last_column(sheet, layout);

    for row in layout.first_row..=last_row {
        let (anchor, half) = if (row - layout.first_row) % 2 == 0 {
            (row, ShiftHalf::Am)
        } else {
            (row - 1, ShiftHalf::Pm)
        };
        let Some(trainee) = sheet.text(anchor, layout.name_column) else {
            continue;
        };

        for column in layout.first_date_column..=last_column {
            if sheet.is_blank(row, column) {
                continue;
            }
            match sheet.value(layout.header_row, column).as_date() {
                Some(date) => batch.assignments.push(ShiftAssignment {
                    trainee: trainee.clone(),
                    schedule: Schedule::Slot(ShiftSlot::new(date, half)),
                    rotation: None,
                    source_row: Some(row),
                }),
                None => batch.diagnostics.push(Diagnostic::malformed_row(
                    &sheet.name,
                    row,
                    format!("booking for {} in a column with no date", trainee),
                )),
            }
        }
    }

    batch
}
