//! In-memory workbook store.

use crate::error::{EngineError, EngineResult};
use crate::models::{CellRef, CellValue};

use super::{Grid, SheetId, WorkbookStore};

#[derive(Debug, Clone)]
struct MemorySheet {
    name: String,
    grid: Grid,
}

/// A workbook held entirely in memory.
///
/// Saving only bumps a counter, which lets tests observe the save policy.
///
/// # Example
///
/// ```
/// use ears_fill::models::CellRef;
/// use ears_fill::store::{MemoryWorkbook, WorkbookStore};
///
/// let mut book = MemoryWorkbook::new();
/// let sheet = book.add_sheet("EAR_Jul_24");
/// book.write(sheet, CellRef::new(9, 13), "P").unwrap();
/// assert_eq!(book.text(sheet, "I13").as_deref(), Some("P"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
    saves: usize,
}

impl MemoryWorkbook {
    /// Creates a workbook with no sheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty sheet and returns its handle.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> SheetId {
        self.sheets.push(MemorySheet {
            name: name.into(),
            grid: Grid::new(),
        });
        SheetId::new(self.sheets.len() - 1)
    }

    /// Returns a sheet's grid.
    pub fn grid(&self, id: SheetId) -> EngineResult<&Grid> {
        let count = self.sheets.len();
        self.sheets
            .get(id.index())
            .map(|s| &s.grid)
            .ok_or(EngineError::SheetIdOutOfRange {
                id: id.index(),
                count,
            })
    }

    /// Returns a sheet's grid for editing.
    pub fn grid_mut(&mut self, id: SheetId) -> EngineResult<&mut Grid> {
        let count = self.sheets.len();
        self.sheets
            .get_mut(id.index())
            .map(|s| &mut s.grid)
            .ok_or(EngineError::SheetIdOutOfRange {
                id: id.index(),
                count,
            })
    }

    /// Sets a cell by A1 reference. Panics on a malformed reference or unknown sheet;
    /// intended for building fixtures.
    pub fn set(&mut self, id: SheetId, a1: &str, value: impl Into<CellValue>) {
        let cell: CellRef = a1.parse().expect("valid A1 reference");
        self.grid_mut(id).expect("known sheet").set(cell, value);
    }

    /// Reads a cell by A1 reference as text. Returns `None` for empty cells, malformed
    /// references and unknown sheets.
    pub fn text(&self, id: SheetId, a1: &str) -> Option<String> {
        let cell: CellRef = a1.parse().ok()?;
        self.grid(id).ok()?.get(cell).as_text()
    }

    /// Returns how many times the workbook was saved.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl WorkbookStore for MemoryWorkbook {
    fn sheet_ids(&self) -> Vec<SheetId> {
        (0..self.sheets.len()).map(SheetId::new).collect()
    }

    fn sheet_name(&self, id: SheetId) -> EngineResult<&str> {
        self.sheets
            .get(id.index())
            .map(|s| s.name.as_str())
            .ok_or(EngineError::SheetIdOutOfRange {
                id: id.index(),
                count: self.sheets.len(),
            })
    }

    fn read(&self, id: SheetId, cell: CellRef) -> EngineResult<CellValue> {
        Ok(self.grid(id)?.get(cell).clone())
    }

    fn write(&mut self, id: SheetId, cell: CellRef, value: &str) -> EngineResult<()> {
        self.grid_mut(id)?.set(cell, value);
        Ok(())
    }

    fn save(&mut self) -> EngineResult<()> {
        self.saves += 1;
        Ok(())
    }
}
