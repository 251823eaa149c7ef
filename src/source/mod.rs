//! Source schedule readers.
//!
//! Each source workbook is read once, read-only, through `calamine`, into a
//! [`SourceSheet`]. A shape-specific reader then walks the sheet and yields
//! [`ShiftAssignment`]s, reporting rows it cannot use as diagnostics instead of
//! failing the run.
//!
//! Supported shapes:
//! - [`block`]: one row per trainee block with start and end dates.
//! - [`timed`]: one row per shift with projected/actual instants and hours.
//! - [`block_grid`]: date-range headers with trainee names listed beneath.
//! - [`clinic`]: a date header row with AM/PM rows per trainee.

pub mod block;
pub mod block_grid;
pub mod clinic;
pub mod timed;

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::config::{SheetSelector, SourceConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{CellRef, CellValue, Diagnostic, ShiftAssignment};
use crate::store::Grid;

/// One worksheet of a source workbook, held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSheet {
    /// The worksheet's name.
    pub name: String,
    /// Cell values at their absolute 1-indexed positions.
    pub grid: Grid,
}

impl SourceSheet {
    /// Creates an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grid: Grid::new(),
        }
    }

    /// Returns the value at (`row`, `column`).
    pub fn value(&self, row: u32, column: u32) -> &CellValue {
        self.grid.value(row, column)
    }

    /// Returns the trimmed text at (`row`, `column`), or `None` when blank.
    pub fn text(&self, row: u32, column: u32) -> Option<String> {
        self.value(row, column).as_text()
    }

    /// Returns true when (`row`, `column`) is blank.
    pub fn is_blank(&self, row: u32, column: u32) -> bool {
        self.value(row, column).is_empty()
    }

    /// Sets a cell by A1 reference. Panics on a malformed reference; intended for
    /// building fixtures.
    pub fn set(&mut self, a1: &str, value: impl Into<CellValue>) {
        let cell: CellRef = a1.parse().expect("valid A1 reference");
        self.grid.set(cell, value);
    }
}

fn convert(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(_) => CellValue::Empty,
    }
}

/// Reads one worksheet of the workbook at `path`.
///
/// # Errors
///
/// Returns [`EngineError::WorkbookOpen`] when the file cannot be read and
/// [`EngineError::WorksheetNotFound`] when the selected sheet does not exist.
pub fn load_source_sheet(path: &Path, selector: &SheetSelector) -> EngineResult<SourceSheet> {
    let path_str = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|e| EngineError::WorkbookOpen {
        path: path_str.clone(),
        message: e.to_string(),
    })?;

    let names = workbook.sheet_names().to_vec();
    let name = match selector {
        SheetSelector::Index(index) => names.get(*index).cloned(),
        SheetSelector::Name(name) => names.iter().find(|n| *n == name).cloned(),
    }
    .ok_or_else(|| EngineError::WorksheetNotFound {
        path: path_str.clone(),
        sheet: selector.to_string(),
    })?;

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| EngineError::WorkbookOpen {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

    let mut sheet = SourceSheet::new(name);
    // Range coordinates are relative to its first used cell.
    let (row_offset, column_offset) = range.start().unwrap_or((0, 0));
    for (row, column, data) in range.cells() {
        let value = convert(data);
        if value.is_empty() {
            continue;
        }
        sheet.grid.set_value(
            row_offset + row as u32 + 1,
            column_offset + column as u32 + 1,
            value,
        );
    }

    debug!(path = %path_str, sheet = %sheet.name, cells = sheet.grid.len(), "loaded source sheet");
    Ok(sheet)
}

/// Assignments read from one source, with the rows that could not be used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBatch {
    /// Usable records, in sheet order.
    pub assignments: Vec<ShiftAssignment>,
    /// Rows that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceBatch {
    /// Returns true when the source yielded nothing at all.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.diagnostics.is_empty()
    }
}

/// Reads a configured source into a batch of assignments.
pub fn load_assignments(source: &SourceConfig) -> EngineResult<SourceBatch> {
    let sheet = load_source_sheet(source.path(), source.sheet())?;
    let batch = match source {
        SourceConfig::Block { columns, .. } => block::read(&sheet, columns),
        SourceConfig::Timed { columns, .. } => timed::read(&sheet, columns),
        SourceConfig::BlockGrid { layout, .. } => block_grid::read(&sheet, layout),
        SourceConfig::ClinicGrid { layout, .. } => clinic::read(&sheet, layout),
    };
    Ok(batch)
}
