//! Block schedules: one row per trainee block.
//!
//! Rows are read from `first_row` down until the last-name cell is blank.

use crate::config::BlockColumns;
use crate::models::{Diagnostic, Schedule, ShiftAssignment, format_trainee_name};

use super::{SourceBatch, SourceSheet};

/// Reads every block row of `sheet`.
pub fn read(sheet: &SourceSheet, columns: &BlockColumns) -> SourceBatch {
    let mut batch = SourceBatch::default();
    let mut row = columns.first_row;

    while let Some(last) = sheet.text(row, columns.last_name) {
        let first = sheet.text(row, columns.first_name);
        let start = sheet.value(row, columns.start_date).as_date();
        let end = sheet.value(row, columns.end_date).as_date();

        match (first, start, end) {
            (Some(first), Some(start), Some(end)) => {
                batch.assignments.push(ShiftAssignment {
                    trainee: format_trainee_name(&last, &first),
                    schedule: Schedule::Block { start, end },
                    rotation: sheet.text(row, columns.rotation),
                    source_row: Some(row),
                });
            }
            (None, _, _) => batch.diagnostics.push(Diagnostic::malformed_row(
                &sheet.name,
                row,
                format!("missing first name for '{}'", last),
            )),
            _ => batch.diagnostics.push(Diagnostic::malformed_row(
                &sheet.name,
                row,
                format!("missing or unreadable block dates for '{}'", last),
            )),
        }
        row += 1;
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiagnosticKind;
    use chrono::NaiveDate;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn block_row(sheet: &mut SourceSheet, row: u32, last: &str, first: &str, rotation: &str, start: &str, end: &str) {
        sheet.set(&format!("A{}", row), last);
        sheet.set(&format!("B{}", row), first);
        sheet.set(&format!("F{}", row), rotation);
        sheet.set(&format!("I{}", row), make_date(start));
        sheet.set(&format!("J{}", row), make_date(end));
    }

    #[test]
    fn test_reads_rows_until_blank_last_name() {
        let mut sheet = SourceSheet::new("Block IM");
        block_row(&mut sheet, 2, "Doe", "John", "Inpatient", "2024-07-01", "2024-07-03");
        block_row(&mut sheet, 3, "Roe", "Jane", "Vacation", "2024-07-08", "2024-07-14");
        block_row(&mut sheet, 5, "After", "Gap", "Inpatient", "2024-07-01", "2024-07-02");

        let batch = read(&sheet, &BlockColumns::default());
        assert_eq!(batch.assignments.len(), 2);
        assert!(batch.diagnostics.is_empty());

        let first = &batch.assignments[0];
        assert_eq!(first.trainee, "Doe, John");
        assert_eq!(first.rotation.as_deref(), Some("Inpatient"));
        assert_eq!(first.source_row, Some(2));
        assert_eq!(
            first.schedule,
            Schedule::Block {
                start: make_date("2024-07-01"),
                end: make_date("2024-07-03")
            }
        );
        assert_eq!(batch.assignments[1].trainee, "Roe, Jane");
    }

    #[test]
    fn test_serial_and_text_dates_are_accepted() {
        let mut sheet = SourceSheet::new("Block IM");
        sheet.set("A2", "Doe");
        sheet.set("B2", "John");
        sheet.set("I2", 45474.0);
        sheet.set("J2", "07/03/2024");

        let batch = read(&sheet, &BlockColumns::default());
        assert_eq!(
            batch.assignments[0].schedule,
            Schedule::Block {
                start: make_date("2024-07-01"),
                end: make_date("2024-07-03")
            }
        );
        assert_eq!(batch.assignments[0].rotation, None);
    }

    #[test]
    fn test_missing_dates_are_malformed() {
        let mut sheet = SourceSheet::new("Block IM");
        sheet.set("A2", "Doe");
        sheet.set("B2", "John");
        sheet.set("I2", "TBD");
        block_row(&mut sheet, 3, "Roe", "Jane", "Inpatient", "2024-07-08", "2024-07-14");

        let batch = read(&sheet, &BlockColumns::default());
        assert_eq!(batch.assignments.len(), 1);
        assert_eq!(batch.diagnostics.len(), 1);
        assert_eq!(batch.diagnostics[0].kind, DiagnosticKind::MalformedRow);
        assert!(batch.diagnostics[0].message.starts_with("Block IM row 2"));
    }
}
