//! Block grids: bands of "M/D - M/D" date-range headers with trainee names
//! listed beneath each header.
//!
//! Each anchor cell starts a header band that runs right until a blank header.
//! Headers carry no year. The band starts in the sheet's academic year (the
//! sheet name "AY24..." means 2024) and moves to the next year when a range
//! ends before it starts; later headers in the band keep the new year.

use chrono::NaiveDate;

use crate::config::BlockGridLayout;
use crate::models::{CellRef, Diagnostic, Schedule, ShiftAssignment};

use super::{SourceBatch, SourceSheet};

/// Reads the academic year from a sheet name such as "AY24 Block Schedule".
pub fn year_from_sheet_name(name: &str) -> Option<i32> {
    let digits = name.get(2..4)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().map(|yy| 2000 + yy)
}

fn parse_month_day(text: &str, year: i32) -> Option<NaiveDate> {
    let (month, day) = text.trim().split_once('/')?;
    NaiveDate::from_ymd_opt(year, month.trim().parse().ok()?, day.trim().parse().ok()?)
}

/// Parses a "M/D - M/D" header in `year`, returning the range and the year the
/// range ends in.
pub fn parse_date_range(text: &str, year: i32) -> Option<(NaiveDate, NaiveDate, i32)> {
    let (start, end) = text.split_once(" - ")?;
    let start_date = parse_month_day(start, year)?;
    let end_date = parse_month_day(end, year)?;
    if end_date < start_date {
        let next_year = year + 1;
        return Some((start_date, parse_month_day(end, next_year)?, next_year));
    }
    Some((start_date, end_date, year))
}

/// Reads every header band of `sheet`.
pub fn read(sheet: &SourceSheet, layout: &BlockGridLayout) -> SourceBatch {
    let mut batch = SourceBatch::default();

    let Some(base_year) = layout.year.or_else(|| year_from_sheet_name(&sheet.name)) else {
        let row = layout.anchors.first().map_or(1, |a| a.row);
        batch.diagnostics.push(Diagnostic::malformed_row(
            &sheet.name,
            row,
            "cannot tell the schedule year from the sheet name",
        ));
        return batch;
    };

    for anchor in &layout.anchors {
        read_band(sheet, layout, *anchor, base_year, &mut batch);
    }

    batch
}

fn read_band(
    sheet: &SourceSheet,
    layout: &BlockGridLayout,
    anchor: CellRef,
    base_year: i32,
    batch: &mut SourceBatch,
) {
    let mut year = base_year;
    let mut column = anchor.column;

    while let Some(header) = sheet.text(anchor.row, column) {
        match parse_date_range(&header, year) {
            Some((start, end, end_year)) => {
                year = end_year;
                let mut row = anchor.row + 1;
                while let Some(name) = sheet.text(row, column) {
                    if !layout.skip_names.iter().any(|skip| *skip == name) {
                        batch.assignments.push(ShiftAssignment {
                            trainee: name,
                            schedule: Schedule::Block { start, end },
                            rotation: None,
                            source_row: Some(row),
                        });
                    }
                    row += 1;
                }
            }
            None => batch.diagnostics.push(Diagnostic::malformed_row(
                &sheet.name,
                anchor.row,
                format!(
                    "unreadable date range '{}' in column {}",
                    header,
                    CellRef::new(column, anchor.row).column_letters()
                ),
            )),
        }
        column += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiagnosticKind;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn block(start: &str, end: &str) -> Schedule {
        Schedule::Block {
            start: make_date(start),
            end: make_date(end),
        }
    }

    #[test]
    fn test_year_from_sheet_name() {
        assert_eq!(year_from_sheet_name("AY24 Blocks"), Some(2024));
        assert_eq!(year_from_sheet_name("AY25"), Some(2025));
        assert_eq!(year_from_sheet_name("Sheet1"), None);
        assert_eq!(year_from_sheet_name("AY"), None);
    }

    #[test]
    fn test_parse_date_range_within_year() {
        assert_eq!(
            parse_date_range("9/20 - 10/3", 2024),
            Some((make_date("2024-09-20"), make_date("2024-10-03"), 2024))
        );
        assert_eq!(parse_date_range("9/20-10/3", 2024), None);
        assert_eq!(parse_date_range("Holiday", 2024), None);
    }

    #[test]
    fn test_parse_date_range_across_new_year() {
        assert_eq!(
            parse_date_range("12/23 - 1/5", 2024),
            Some((make_date("2024-12-23"), make_date("2025-01-05"), 2025))
        );
    }

    #[test]
    fn test_reads_names_under_each_header() {
        let mut sheet = SourceSheet::new("AY24 Blocks");
        sheet.set("B3", "7/1 - 7/14");
        sheet.set("B4", "Doe, John");
        sheet.set("B5", "Holiday Coverage");
        sheet.set("B6", "Roe, Jane (PGY2)");
        sheet.set("C3", "7/15 - 7/28");
        sheet.set("C4", "Poe, Ed");

        let batch = read(&sheet, &BlockGridLayout::default());
        assert!(batch.diagnostics.is_empty());
        let names: Vec<&str> = batch.assignments.iter().map(|a| a.trainee.as_str()).collect();
        assert_eq!(names, vec!["Doe, John", "Roe, Jane (PGY2)", "Poe, Ed"]);
        assert_eq!(batch.assignments[0].schedule, block("2024-07-01", "2024-07-14"));
        assert_eq!(batch.assignments[2].schedule, block("2024-07-15", "2024-07-28"));
        assert_eq!(batch.assignments[1].source_row, Some(6));
    }

    #[test]
    fn test_year_rollover_carries_to_later_headers() {
        let mut sheet = SourceSheet::new("AY24 Blocks");
        sheet.set("B3", "12/23 - 1/5");
        sheet.set("B4", "Doe, John");
        sheet.set("C3", "1/6 - 1/19");
        sheet.set("C4", "Doe, John");

        let batch = read(&sheet, &BlockGridLayout::default());
        assert_eq!(batch.assignments[0].schedule, block("2024-12-23", "2025-01-05"));
        assert_eq!(batch.assignments[1].schedule, block("2025-01-06", "2025-01-19"));
    }

    #[test]
    fn test_second_band_restarts_at_base_year() {
        let mut sheet = SourceSheet::new("AY24 Blocks");
        sheet.set("B3", "12/23 - 1/5");
        sheet.set("C12", "7/1 - 7/7");
        sheet.set("C13", "Roe, Jane");

        let batch = read(&sheet, &BlockGridLayout::default());
        assert_eq!(batch.assignments.len(), 1);
        assert_eq!(batch.assignments[0].schedule, block("2024-07-01", "2024-07-07"));
    }

    #[test]
    fn test_configured_year_overrides_sheet_name() {
        let mut sheet = SourceSheet::new("Blocks");
        sheet.set("B3", "7/1 - 7/2");
        sheet.set("B4", "Doe, John");
        let layout = BlockGridLayout {
            year: Some(2023),
            ..BlockGridLayout::default()
        };

        let batch = read(&sheet, &layout);
        assert_eq!(batch.assignments[0].schedule, block("2023-07-01", "2023-07-02"));
    }

    #[test]
    fn test_unknown_year_and_bad_header_are_reported() {
        let mut sheet = SourceSheet::new("Blocks");
        sheet.set("B3", "7/1 - 7/2");
        let batch = read(&sheet, &BlockGridLayout::default());
        assert_eq!(batch.diagnostics.len(), 1);
        assert!(batch.assignments.is_empty());

        let mut sheet = SourceSheet::new("AY24");
        sheet.set("B3", "TBD");
        sheet.set("C3", "7/1 - 7/2");
        sheet.set("C4", "Doe, John");
        let batch = read(&sheet, &BlockGridLayout::default());
        assert_eq!(batch.assignments.len(), 1);
        assert_eq!(batch.diagnostics[0].kind, DiagnosticKind::MalformedRow);
        assert!(batch.diagnostics[0].message.contains("'TBD'"));
    }
}
