//! Spreadsheet stores.
//!
//! The engine never talks to a spreadsheet library directly. It reads and writes
//! cells through the [`WorkbookStore`] trait, which identifies sheets by opaque
//! [`SheetId`] handles rather than by their names or printed form.
//!
//! Two implementations are provided:
//! - [`MemoryWorkbook`]: sheets held in memory, used by tests and dry runs.
//! - [`XlsxWorkbook`]: an `.xlsx`/`.xlsm` file opened, edited in place and saved.

mod memory;
mod xlsx;

use std::collections::HashMap;

use crate::error::EngineResult;
use crate::models::{CellRef, CellValue};

pub use memory::MemoryWorkbook;
pub use xlsx::XlsxWorkbook;

/// An opaque handle to one worksheet of a store.
///
/// Handles are only meaningful for the store that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(usize);

impl SheetId {
    /// Creates a handle for the sheet at `index` in workbook order.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the sheet's position in workbook order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A workbook the engine can read cells from and write presence codes into.
pub trait WorkbookStore {
    /// Returns every sheet handle, in workbook order.
    fn sheet_ids(&self) -> Vec<SheetId>;

    /// Returns the display name of a sheet.
    fn sheet_name(&self, id: SheetId) -> EngineResult<&str>;

    /// Reads one cell.
    fn read(&self, id: SheetId, cell: CellRef) -> EngineResult<CellValue>;

    /// Overwrites one cell with a text value.
    fn write(&mut self, id: SheetId, cell: CellRef, value: &str) -> EngineResult<()>;

    /// Persists all writes made so far.
    fn save(&mut self) -> EngineResult<()>;

    /// Finds a sheet by its display name.
    fn sheet_by_name(&self, name: &str) -> Option<SheetId> {
        self.sheet_ids()
            .into_iter()
            .find(|id| self.sheet_name(*id).is_ok_and(|n| n == name))
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// A sparse grid of cell values keyed by 1-indexed (row, column).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: HashMap<(u32, u32), CellValue>,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value at (`row`, `column`), or an empty value.
    pub fn value(&self, row: u32, column: u32) -> &CellValue {
        self.cells.get(&(row, column)).unwrap_or(&EMPTY)
    }

    /// Returns the value at `cell`, or an empty value.
    pub fn get(&self, cell: CellRef) -> &CellValue {
        self.value(cell.row, cell.column)
    }

    /// Stores a value, removing the entry when the value is empty.
    pub fn set(&mut self, cell: CellRef, value: impl Into<CellValue>) {
        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&(cell.row, cell.column));
        } else {
            self.cells.insert((cell.row, cell.column), value);
        }
    }

    /// Stores a value by row and column.
    pub fn set_value(&mut self, row: u32, column: u32, value: impl Into<CellValue>) {
        self.set(CellRef::new(column, row), value);
    }

    /// Returns the number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when the grid holds no values.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over the non-empty cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &CellValue)> {
        self.cells
            .iter()
            .map(|(&(row, column), value)| (CellRef::new(column, row), value))
    }
}
