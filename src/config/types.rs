//! Configuration types for a populate run.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from a site's YAML file. Every layout field defaults to the layout
//! of the current EARS templates, so a site file only needs to name its workbooks.

use std::fmt;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::CellRef;

/// Selects a worksheet either by position (0-based) or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    /// The sheet at this 0-based position in workbook order.
    Index(usize),
    /// The sheet with this name.
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(index) => write!(f, "#{}", index),
            SheetSelector::Name(name) => f.write_str(name),
        }
    }
}

/// Fixed layout of the monthly sheets of an EARS workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarsLayout {
    /// Row of the first trainee's AM entries.
    pub first_anchor_row: u32,
    /// Optional last row to scan for names; scanning otherwise stops at the first blank.
    pub last_anchor_row: Option<u32>,
    /// Column holding trainee names (1-indexed, 2 = "B").
    pub name_column: u32,
    /// Column of day 1 of the month (1-indexed, 9 = "I").
    pub first_day_column: u32,
    /// Cell holding the sheet's year label.
    pub year_cell: CellRef,
    /// Cell holding the sheet's month name.
    pub month_cell: CellRef,
    /// Cell holding the sheet's last covered date.
    pub end_date_cell: CellRef,
    /// Names of index, legend and summary sheets that are never monthly sheets.
    pub excluded_sheets: Vec<String>,
}

impl Default for EarsLayout {
    fn default() -> Self {
        Self {
            first_anchor_row: 13,
            last_anchor_row: None,
            name_column: 2,
            first_day_column: 9,
            year_cell: CellRef::new(3, 9),
            month_cell: CellRef::new(3, 8),
            end_date_cell: CellRef::new(7, 4),
            excluded_sheets: [
                "HPT_List",
                "D",
                "CODES",
                "FINAL RECONCILIATION",
                "EAR_OVERVIEW",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl EarsLayout {
    /// Returns true when `sheet_name` is on the exclusion list.
    pub fn is_excluded(&self, sheet_name: &str) -> bool {
        self.excluded_sheets.iter().any(|s| s == sheet_name)
    }
}

fn default_shared_sheet() -> SheetSelector {
    SheetSelector::Index(5)
}

/// How trainee names are mapped to rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NameIndexMode {
    /// One index built from a representative sheet and used for every sheet.
    Shared {
        /// The representative sheet.
        #[serde(default = "default_shared_sheet")]
        sheet: SheetSelector,
    },
    /// One index per monthly sheet, tolerating per-sheet layout drift.
    PerSheet,
}

impl Default for NameIndexMode {
    fn default() -> Self {
        NameIndexMode::Shared {
            sheet: default_shared_sheet(),
        }
    }
}

/// When the EARS workbook is written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Save after every cell write.
    EachWrite,
    /// Save once after the last record.
    #[default]
    EndOfRun,
    /// Never save (dry run).
    Never,
}

/// Shift-length bands used to classify timed shifts.
///
/// Lengths in `(0, single_max_hours)` cover one half-day; lengths in
/// `[double_min_hours, double_max_hours]` cover two. Anything else is unrecognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftBands {
    /// Exclusive upper bound for single half-day shifts.
    pub single_max_hours: Decimal,
    /// Inclusive lower bound for two half-day shifts.
    pub double_min_hours: Decimal,
    /// Inclusive upper bound for two half-day shifts.
    pub double_max_hours: Decimal,
    /// Shifts starting at or after this hour begin in the PM half.
    pub afternoon_hour: u32,
}

impl Default for ShiftBands {
    fn default() -> Self {
        Self {
            single_max_hours: Decimal::new(75, 1),
            double_min_hours: Decimal::new(8, 0),
            double_max_hours: Decimal::new(24, 0),
            afternoon_hour: 12,
        }
    }
}

/// Column layout of a block schedule (one row per trainee block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockColumns {
    /// First data row.
    pub first_row: u32,
    /// Last name column; a blank here ends the table.
    pub last_name: u32,
    /// First name column.
    pub first_name: u32,
    /// Rotation description column.
    pub rotation: u32,
    /// Block start date column.
    pub start_date: u32,
    /// Block end date column.
    pub end_date: u32,
}

impl Default for BlockColumns {
    fn default() -> Self {
        Self {
            first_row: 2,
            last_name: 1,
            first_name: 2,
            rotation: 6,
            start_date: 9,
            end_date: 10,
        }
    }
}

/// Column layout of a timed-shift schedule (one row per shift).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimedColumns {
    /// First data row.
    pub first_row: u32,
    /// Last name column; a blank here ends the table.
    pub last_name: u32,
    /// First name column.
    pub first_name: u32,
    /// Rotation description column.
    pub rotation: u32,
    /// Recorded shift length in hours.
    pub hours: u32,
    /// Projected start instant.
    pub projected_start: u32,
    /// Actual start instant.
    pub actual_start: u32,
    /// Projected end instant.
    pub projected_end: u32,
    /// Actual end instant.
    pub actual_end: u32,
}

impl Default for TimedColumns {
    fn default() -> Self {
        Self {
            first_row: 2,
            last_name: 1,
            first_name: 2,
            rotation: 6,
            hours: 11,
            projected_start: 14,
            actual_start: 15,
            projected_end: 16,
            actual_end: 17,
        }
    }
}

/// Layout of a block grid: date-range headers with trainee names listed beneath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockGridLayout {
    /// Cells holding the first date-range header of each header band.
    pub anchors: Vec<CellRef>,
    /// Entries in the name lists that are not trainees.
    pub skip_names: Vec<String>,
    /// Starting year; taken from the sheet name ("AY24..." → 2024) when absent.
    pub year: Option<i32>,
}

impl Default for BlockGridLayout {
    fn default() -> Self {
        Self {
            anchors: vec![CellRef::new(2, 3), CellRef::new(3, 12)],
            skip_names: vec!["Holiday Coverage".to_string()],
            year: None,
        }
    }
}

/// Layout of a clinic grid: a row of dates across the top and two rows per trainee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicGridLayout {
    /// Row holding the dates.
    pub header_row: u32,
    /// First trainee (AM) row.
    pub first_row: u32,
    /// Column holding trainee names.
    pub name_column: u32,
    /// First date column.
    pub first_date_column: u32,
}

impl Default for ClinicGridLayout {
    fn default() -> Self {
        Self {
            header_row: 1,
            first_row: 2,
            name_column: 1,
            first_date_column: 2,
        }
    }
}

fn second_sheet() -> SheetSelector {
    SheetSelector::Index(1)
}

fn clinic_sheet() -> SheetSelector {
    SheetSelector::Name("VA Clinic Report".to_string())
}

/// One source schedule to copy into the EARS workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A block schedule with start and end dates per row.
    Block {
        /// Workbook path.
        path: PathBuf,
        /// Worksheet to read.
        #[serde(default)]
        sheet: SheetSelector,
        /// Column layout.
        #[serde(default)]
        columns: BlockColumns,
    },
    /// A timed-shift schedule with start/end instants and hours per row.
    Timed {
        /// Workbook path.
        path: PathBuf,
        /// Worksheet to read.
        #[serde(default = "second_sheet")]
        sheet: SheetSelector,
        /// Column layout.
        #[serde(default)]
        columns: TimedColumns,
    },
    /// A block grid with date-range headers.
    BlockGrid {
        /// Workbook path.
        path: PathBuf,
        /// Worksheet to read.
        #[serde(default)]
        sheet: SheetSelector,
        /// Grid layout.
        #[serde(default)]
        layout: BlockGridLayout,
    },
    /// A clinic grid with AM/PM rows per trainee.
    ClinicGrid {
        /// Workbook path.
        path: PathBuf,
        /// Worksheet to read.
        #[serde(default = "clinic_sheet")]
        sheet: SheetSelector,
        /// Grid layout.
        #[serde(default)]
        layout: ClinicGridLayout,
    },
}

impl SourceConfig {
    /// Returns the source workbook path.
    pub fn path(&self) -> &Path {
        match self {
            SourceConfig::Block { path, .. }
            | SourceConfig::Timed { path, .. }
            | SourceConfig::BlockGrid { path, .. }
            | SourceConfig::ClinicGrid { path, .. } => path,
        }
    }

    pub(crate) fn path_mut(&mut self) -> &mut PathBuf {
        match self {
            SourceConfig::Block { path, .. }
            | SourceConfig::Timed { path, .. }
            | SourceConfig::BlockGrid { path, .. }
            | SourceConfig::ClinicGrid { path, .. } => path,
        }
    }

    /// Returns the selected worksheet.
    pub fn sheet(&self) -> &SheetSelector {
        match self {
            SourceConfig::Block { sheet, .. }
            | SourceConfig::Timed { sheet, .. }
            | SourceConfig::BlockGrid { sheet, .. }
            | SourceConfig::ClinicGrid { sheet, .. } => sheet,
        }
    }

    /// Returns a short label for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Block { .. } => "block",
            SourceConfig::Timed { .. } => "timed",
            SourceConfig::BlockGrid { .. } => "block_grid",
            SourceConfig::ClinicGrid { .. } => "clinic_grid",
        }
    }
}

/// The EARS workbook and how to read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarsConfig {
    /// Workbook path.
    pub path: PathBuf,
    /// Monthly sheet layout.
    #[serde(default)]
    pub layout: EarsLayout,
    /// Name index strategy.
    #[serde(default)]
    pub name_index: NameIndexMode,
}

/// The complete configuration of one populate run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Site label (e.g. "BMC"), carried into the report.
    pub site: String,
    /// The EARS workbook.
    pub ears: EarsConfig,
    /// When to save the EARS workbook.
    #[serde(default)]
    pub save_policy: SavePolicy,
    /// Timed shift classification bands.
    #[serde(default)]
    pub shift_bands: ShiftBands,
    /// Source schedules, processed in order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}
