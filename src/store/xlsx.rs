//! `.xlsx`/`.xlsm` workbook store backed by `umya-spreadsheet`.

use std::path::{Path, PathBuf};

use tracing::debug;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::error::{EngineError, EngineResult};
use crate::models::{CellRef, CellValue};

use super::{SheetId, WorkbookStore};

/// An EARS workbook opened from disk and saved back to the same path.
pub struct XlsxWorkbook {
    path: PathBuf,
    book: Spreadsheet,
}

impl XlsxWorkbook {
    /// Opens the workbook at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkbookOpen`] when the file is missing or is not a
    /// readable OOXML workbook.
    pub fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let book = umya_spreadsheet::reader::xlsx::read(&path).map_err(|e| {
            EngineError::WorkbookOpen {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        debug!(path = %path.display(), sheets = book.get_sheet_collection().len(), "opened workbook");
        Ok(Self { path, book })
    }

    /// Returns the path the workbook is saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sheet(&self, id: SheetId) -> EngineResult<&Worksheet> {
        let sheets = self.book.get_sheet_collection();
        sheets.get(id.index()).ok_or(EngineError::SheetIdOutOfRange {
            id: id.index(),
            count: sheets.len(),
        })
    }

    fn sheet_mut(&mut self, id: SheetId) -> EngineResult<&mut Worksheet> {
        let sheets = self.book.get_sheet_collection_mut();
        let count = sheets.len();
        sheets
            .get_mut(id.index())
            .ok_or(EngineError::SheetIdOutOfRange {
                id: id.index(),
                count,
            })
    }
}

/// Interprets umya's raw cell text: numbers (including date serials) stay numeric,
/// everything else is text.
fn parse_raw_value(raw: String) -> CellValue {
    if raw.trim().is_empty() {
        return CellValue::Empty;
    }
    match raw.trim().parse::<f64>() {
        Ok(number) => CellValue::Number(number),
        Err(_) => CellValue::Text(raw),
    }
}

impl WorkbookStore for XlsxWorkbook {
    fn sheet_ids(&self) -> Vec<SheetId> {
        (0..self.book.get_sheet_collection().len())
            .map(SheetId::new)
            .collect()
    }

    fn sheet_name(&self, id: SheetId) -> EngineResult<&str> {
        Ok(self.sheet(id)?.get_name())
    }

    fn read(&self, id: SheetId, cell: CellRef) -> EngineResult<CellValue> {
        let raw = self.sheet(id)?.get_value((cell.column, cell.row));
        Ok(parse_raw_value(raw))
    }

    fn write(&mut self, id: SheetId, cell: CellRef, value: &str) -> EngineResult<()> {
        self.sheet_mut(id)?
            .get_cell_mut((cell.column, cell.row))
            .set_value_string(value);
        Ok(())
    }

    fn save(&mut self) -> EngineResult<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path).map_err(|e| {
            EngineError::WorkbookSave {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        debug!(path = %self.path.display(), "saved workbook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_value() {
        assert_eq!(parse_raw_value(String::new()), CellValue::Empty);
        assert_eq!(parse_raw_value("2024".to_string()), CellValue::Number(2024.0));
        assert_eq!(
            parse_raw_value("45504".to_string()),
            CellValue::Number(45504.0)
        );
        assert_eq!(
            parse_raw_value("July".to_string()),
            CellValue::Text("July".to_string())
        );
    }

    #[test]
    fn test_open_missing_file_is_workbook_open_error() {
        let result = XlsxWorkbook::open("/nonexistent/EARS.xlsm");
        match result {
            Err(EngineError::WorkbookOpen { path, .. }) => {
                assert!(path.contains("EARS.xlsm"));
            }
            _ => panic!("Expected WorkbookOpen error"),
        }
    }

    #[test]
    fn test_write_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ears.xlsx");

        let mut book = umya_spreadsheet::new_file();
        book.new_sheet("EAR_Jul_24").unwrap();
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        let mut workbook = XlsxWorkbook::open(&path).unwrap();
        let sheet = workbook.sheet_by_name("EAR_Jul_24").unwrap();
        workbook.write(sheet, CellRef::new(9, 13), "P").unwrap();
        workbook.save().unwrap();

        let reopened = XlsxWorkbook::open(&path).unwrap();
        let sheet = reopened.sheet_by_name("EAR_Jul_24").unwrap();
        assert_eq!(
            reopened.read(sheet, CellRef::new(9, 13)).unwrap(),
            CellValue::Text("P".to_string())
        );
        assert_eq!(
            reopened.read(sheet, CellRef::new(9, 14)).unwrap(),
            CellValue::Empty
        );
    }
}
