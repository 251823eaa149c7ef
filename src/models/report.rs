//! Run diagnostics and the end-of-run report.
//!
//! Every per-record problem the engine can recover from is recorded as a
//! [`Diagnostic`] and the run carries on. The [`RunReport`] is handed back to the
//! operator at the end so the affected cells can be fixed by hand.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of problem a diagnostic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No monthly sheet covers the date.
    SheetNotFound,
    /// The trainee has no rows on the monthly sheet.
    NameNotFound,
    /// The recorded shift length falls outside every classification band.
    UnrecognizedShiftLength,
    /// Two monthly sheets claim the same date.
    OverlappingSheets,
    /// A source row is missing a required value.
    MalformedRow,
}

impl DiagnosticKind {
    /// Returns the stable code used in printed diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::SheetNotFound => "SHEET_NOT_FOUND",
            DiagnosticKind::NameNotFound => "NAME_NOT_FOUND",
            DiagnosticKind::UnrecognizedShiftLength => "UNRECOGNIZED_SHIFT_LENGTH",
            DiagnosticKind::OverlappingSheets => "OVERLAPPING_SHEETS",
            DiagnosticKind::MalformedRow => "MALFORMED_ROW",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A recoverable problem met during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The trainee concerned, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainee: Option<String>,
    /// A human-readable description including the failing date or value.
    pub message: String,
}

impl Diagnostic {
    /// No monthly sheet covers `date`.
    pub fn sheet_not_found(trainee: &str, date: NaiveDate) -> Self {
        Self {
            kind: DiagnosticKind::SheetNotFound,
            trainee: Some(trainee.to_string()),
            message: format!("No sheet found for {} on {}", trainee, date),
        }
    }

    /// `trainee` has no rows on `sheet`.
    pub fn name_not_found(trainee: &str, sheet: &str, date: NaiveDate) -> Self {
        Self {
            kind: DiagnosticKind::NameNotFound,
            trainee: Some(trainee.to_string()),
            message: format!("{} not found on sheet '{}' ({})", trainee, sheet, date),
        }
    }

    /// The shift length `hours` could not be bucketed.
    pub fn unrecognized_shift_length(trainee: &str, hours: Decimal, start: NaiveDateTime) -> Self {
        Self {
            kind: DiagnosticKind::UnrecognizedShiftLength,
            trainee: Some(trainee.to_string()),
            message: format!(
                "Unrecognized shift length {}h for {}, shift starts {}",
                hours.normalize(),
                trainee,
                start
            ),
        }
    }

    /// Sheets `first` and `second` both cover `date`.
    pub fn overlapping_sheets(first: &str, second: &str, date: NaiveDate) -> Self {
        Self {
            kind: DiagnosticKind::OverlappingSheets,
            trainee: None,
            message: format!(
                "Sheets '{}' and '{}' both cover {}; '{}' wins",
                first, second, date, first
            ),
        }
    }

    /// A source row could not be read.
    pub fn malformed_row(source: &str, row: u32, reason: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::MalformedRow,
            trainee: None,
            message: format!("{} row {}: {}", source, row, reason.into()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// The outcome of a populate run.
///
/// # Example
///
/// ```
/// use ears_fill::models::{Diagnostic, DiagnosticKind, RunReport};
/// use chrono::NaiveDate;
///
/// let mut report = RunReport::new("BMC");
/// report.push(Diagnostic::sheet_not_found(
///     "Doe, John",
///     NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
/// ));
/// assert_eq!(report.count(DiagnosticKind::SheetNotFound), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique identifier for this run, also attached to its log lines.
    pub run_id: Uuid,
    /// The site label from the configuration.
    pub site: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Number of source records processed.
    pub records_processed: usize,
    /// Number of cells written.
    pub cells_written: usize,
    /// Number of times the EARS workbook was saved.
    pub saves: usize,
    /// Recoverable problems, in the order they were met.
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Creates an empty report with a fresh run id.
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            site: site.into(),
            started_at: Utc::now(),
            records_processed: 0,
            cells_written: 0,
            saves: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Records a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Records several diagnostics.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Returns how many diagnostics of `kind` were recorded.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Returns true when the run needs manual follow-up.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
