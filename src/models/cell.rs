//! Cell coordinates and cell values.
//!
//! Spreadsheet coordinates here are 1-indexed, the way spreadsheet users read them:
//! column 1 is "A", row 1 is the first row.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A 1-indexed (column, row) cell coordinate.
///
/// Parses from and renders to A1 notation.
///
/// # Example
///
/// ```
/// use ears_fill::models::CellRef;
///
/// let cell: CellRef = "AB14".parse().unwrap();
/// assert_eq!(cell.column, 28);
/// assert_eq!(cell.row, 14);
/// assert_eq!(cell.to_string(), "AB14");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    /// 1-indexed column (1 = "A").
    pub column: u32,
    /// 1-indexed row.
    pub row: u32,
}

impl CellRef {
    /// Creates a cell reference from a 1-indexed column and row.
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Returns the column letters of this reference (e.g. "AA").
    pub fn column_letters(&self) -> String {
        column_letters(self.column)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

impl FromStr for CellRef {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidCellReference {
            reference: s.to_string(),
        };

        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);

        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let column = letters
            .chars()
            .try_fold(0u32, |acc, c| {
                let value = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
                acc.checked_mul(26)?.checked_add(value)
            })
            .ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;

        if row == 0 {
            return Err(invalid());
        }

        Ok(Self { column, row })
    }
}

impl TryFrom<String> for CellRef {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellRef> for String {
    fn from(cell: CellRef) -> Self {
        cell.to_string()
    }
}

/// Converts a 1-indexed column number into spreadsheet letters.
///
/// Column 9 is "I", 26 is "Z", 27 is "AA". Returns an empty string for column 0.
pub fn column_letters(column: u32) -> String {
    let mut letters = Vec::new();
    let mut remaining = column;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push((b'A' + offset as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// The value read from a spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// An empty or missing cell.
    #[default]
    Empty,
    /// A text value.
    Text(String),
    /// A numeric value. Dates stored without a date type arrive here as Excel serials.
    Number(f64),
    /// A date-time value.
    DateTime(NaiveDateTime),
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

impl CellValue {
    /// Builds a value from text, treating blank text as [`CellValue::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    /// Returns true when the cell holds nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the value rendered as trimmed text, or `None` for an empty cell.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::DateTime(dt) => Some(dt.to_string()),
        }
    }

    /// Returns the value as a number when it is numeric or numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the value as a whole number.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64()
            .filter(|n| n.fract() == 0.0)
            .map(|n| n as i64)
    }

    /// Returns the value as a date-time.
    ///
    /// Numbers are read as 1900-system Excel serials; text is tried against a small set
    /// of ISO and US formats.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Number(n) => excel_serial_to_datetime(*n),
            CellValue::Text(s) => parse_datetime_text(s.trim()),
            CellValue::Empty => None,
        }
    }

    /// Returns the calendar date of the value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        self.as_datetime().map(|dt| dt.date())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::DateTime(value.and_time(chrono::NaiveTime::MIN))
    }
}

fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

/// Converts a 1900-system Excel serial number into a date-time.
///
/// Serial 1.0 is 1899-12-31 and the fractional part is the time of day. Returns `None`
/// for negative or non-finite serials.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::try_seconds(seconds)?)
}

/// Converts a date-time into a 1900-system Excel serial number.
pub fn datetime_to_excel_serial(datetime: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let elapsed = datetime - epoch;
    elapsed.num_seconds() as f64 / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_column_letters_single_and_double() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(9), "I");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(39), "AM");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(53), "BA");
        assert_eq!(column_letters(0), "");
    }

    #[test]
    fn test_parse_a1_reference() {
        let cell: CellRef = "C9".parse().unwrap();
        assert_eq!(cell, CellRef::new(3, 9));

        let cell: CellRef = "g4".parse().unwrap();
        assert_eq!(cell, CellRef::new(7, 4));

        let cell: CellRef = "AA13".parse().unwrap();
        assert_eq!(cell, CellRef::new(27, 13));
    }

    #[test]
    fn test_parse_rejects_malformed_references() {
        assert!("".parse::<CellRef>().is_err());
        assert!("13".parse::<CellRef>().is_err());
        assert!("B".parse::<CellRef>().is_err());
        assert!("B0".parse::<CellRef>().is_err());
        assert!("B1C".parse::<CellRef>().is_err());
        assert!("1B".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for text in ["A1", "I13", "Z14", "AA13", "AM362"] {
            let cell: CellRef = text.parse().unwrap();
            assert_eq!(cell.to_string(), text);
        }
    }

    #[test]
    fn test_cell_ref_deserializes_from_yaml_string() {
        let cell: CellRef = serde_yaml::from_str("\"G4\"").unwrap();
        assert_eq!(cell, CellRef::new(7, 4));

        let bad: Result<CellRef, _> = serde_yaml::from_str("\"4G\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_excel_serial_conversion() {
        // 45474 is 2024-07-01 in the 1900 date system.
        let dt = excel_serial_to_datetime(45474.0).unwrap();
        assert_eq!(dt, make_datetime("2024-07-01 00:00:00"));

        let dt = excel_serial_to_datetime(45474.75).unwrap();
        assert_eq!(dt, make_datetime("2024-07-01 18:00:00"));

        assert!(excel_serial_to_datetime(-1.0).is_none());
        assert!(excel_serial_to_datetime(f64::NAN).is_none());
    }

    #[test]
    fn test_datetime_to_serial_inverts_conversion() {
        let dt = make_datetime("2024-07-31 00:00:00");
        let serial = datetime_to_excel_serial(dt);
        assert_eq!(serial, 45504.0);
        assert_eq!(excel_serial_to_datetime(serial).unwrap(), dt);
    }

    #[test]
    fn test_cell_value_date_from_text() {
        let value = CellValue::text("2024-07-31");
        assert_eq!(value.as_date(), NaiveDate::from_ymd_opt(2024, 7, 31));

        let value = CellValue::text("7/31/2024");
        assert_eq!(value.as_date(), NaiveDate::from_ymd_opt(2024, 7, 31));

        let value = CellValue::text("2024-07-31 20:30:00");
        assert_eq!(
            value.as_datetime(),
            Some(make_datetime("2024-07-31 20:30:00"))
        );

        assert!(CellValue::text("July").as_date().is_none());
    }

    #[test]
    fn test_cell_value_integers() {
        assert_eq!(CellValue::Number(2024.0).as_i64(), Some(2024));
        assert_eq!(CellValue::text(" 2024 ").as_i64(), Some(2024));
        assert_eq!(CellValue::Number(7.5).as_i64(), None);
        assert_eq!(CellValue::Empty.as_i64(), None);
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert_eq!(CellValue::text("   "), CellValue::Empty);
        assert!(CellValue::Text("  ".to_string()).is_empty());
        assert!(CellValue::Text("  ".to_string()).as_text().is_none());
        assert_eq!(
            CellValue::text(" Doe, John ").as_text().as_deref(),
            Some("Doe, John")
        );
        assert_eq!(CellValue::Number(13.0).as_text().as_deref(), Some("13"));
    }
}
