//! Trainee name to anchor-row indexes.
//!
//! Names sit in the name column of each monthly sheet, one every two rows
//! starting at the first anchor row. The row holding a name is the trainee's AM
//! row; the row below it is the PM row.

use std::collections::HashMap;

use crate::config::{EarsLayout, NameIndexMode, SheetSelector};
use crate::error::{EngineError, EngineResult};
use crate::models::CellRef;
use crate::store::{SheetId, WorkbookStore};

use super::date_sheet::DateSheetResolver;

/// Normalizes a trainee name for lookup.
///
/// Drops a trailing " (qualifier)" suffix and surrounding whitespace.
///
/// # Example
///
/// ```
/// use ears_fill::mapping::lookup_key;
///
/// assert_eq!(lookup_key("Vergara Greeno, Rebeca (DGM)"), "Vergara Greeno, Rebeca");
/// assert_eq!(lookup_key("  Doe, John "), "Doe, John");
/// ```
pub fn lookup_key(name: &str) -> &str {
    name.split(" (").next().unwrap_or(name).trim()
}

/// Maps trainee names to their anchor (AM) rows on one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRowIndex {
    rows: HashMap<String, u32>,
}

impl NameRowIndex {
    /// Scans the name column of sheet `id`.
    ///
    /// Without a `last_anchor_row` the scan stops at the first blank name cell.
    /// With one, it covers every anchor row up to that row and skips blanks.
    /// A name listed twice maps to its last row.
    pub fn build<S: WorkbookStore>(
        store: &S,
        id: SheetId,
        layout: &EarsLayout,
    ) -> EngineResult<Self> {
        let mut rows = HashMap::new();
        let mut row = layout.first_anchor_row;

        loop {
            if layout.last_anchor_row.is_some_and(|last| row > last) {
                break;
            }
            let name = store.read(id, CellRef::new(layout.name_column, row))?.as_text();
            match name {
                Some(name) => {
                    rows.insert(name, row);
                }
                None if layout.last_anchor_row.is_none() => break,
                None => {}
            }
            row += 2;
        }

        Ok(Self { rows })
    }

    /// Builds an index from explicit (name, row) pairs.
    pub fn from_entries<I, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, u32)>,
        N: Into<String>,
    {
        Self {
            rows: entries.into_iter().map(|(n, r)| (n.into(), r)).collect(),
        }
    }

    /// Returns the anchor row for `name` after normalizing it with [`lookup_key`].
    pub fn anchor_row(&self, name: &str) -> Option<u32> {
        self.rows.get(lookup_key(name)).copied()
    }

    /// Returns the number of indexed names.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no names were found.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The name indexes used for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameDirectory {
    /// One index applied to every sheet.
    Shared(NameRowIndex),
    /// One index per monthly sheet.
    PerSheet(HashMap<SheetId, NameRowIndex>),
}

impl NameDirectory {
    /// Builds the indexes for `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorksheetNotFound`] when the shared index sheet does
    /// not exist.
    pub fn build<S: WorkbookStore>(
        store: &S,
        mode: &NameIndexMode,
        layout: &EarsLayout,
    ) -> EngineResult<Self> {
        match mode {
            NameIndexMode::Shared { sheet } => {
                let id = select_sheet(store, sheet)?;
                Ok(NameDirectory::Shared(NameRowIndex::build(store, id, layout)?))
            }
            NameIndexMode::PerSheet => {
                // Only sheets that can resolve a date need an index.
                let mut indexes = HashMap::new();
                for sheet in DateSheetResolver::new(layout).monthly_sheets(store)? {
                    indexes.insert(sheet.id, NameRowIndex::build(store, sheet.id, layout)?);
                }
                Ok(NameDirectory::PerSheet(indexes))
            }
        }
    }

    /// Returns the index that applies to sheet `id`.
    pub fn index_for(&self, id: SheetId) -> Option<&NameRowIndex> {
        match self {
            NameDirectory::Shared(index) => Some(index),
            NameDirectory::PerSheet(indexes) => indexes.get(&id),
        }
    }

    /// Returns the anchor row for `name` on sheet `id`.
    pub fn anchor_row(&self, id: SheetId, name: &str) -> Option<u32> {
        self.index_for(id)?.anchor_row(name)
    }
}

fn select_sheet<S: WorkbookStore>(store: &S, selector: &SheetSelector) -> EngineResult<SheetId> {
    let found = match selector {
        SheetSelector::Index(index) => store.sheet_ids().get(*index).copied(),
        SheetSelector::Name(name) => store.sheet_by_name(name),
    };
    found.ok_or_else(|| EngineError::WorksheetNotFound {
        path: "EARS workbook".to_string(),
        sheet: selector.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryWorkbook;

    fn roster(book: &mut MemoryWorkbook, name: &str, names: &[&str]) -> SheetId {
        let id = book.add_sheet(name);
        for (i, trainee) in names.iter().enumerate() {
            book.set(id, &format!("B{}", 13 + 2 * i), *trainee);
        }
        id
    }

    #[test]
    fn test_lookup_key_strips_qualifier() {
        assert_eq!(lookup_key("Doe, John (PGY2)"), "Doe, John");
        assert_eq!(lookup_key("Doe, John"), "Doe, John");
        assert_eq!(lookup_key(""), "");
    }

    #[test]
    fn test_build_indexes_every_other_row() {
        let mut book = MemoryWorkbook::new();
        let id = roster(&mut book, "EAR_Jul_24", &["Doe, John", "Roe, Jane", "Poe, Ed"]);

        let index = NameRowIndex::build(&book, id, &EarsLayout::default()).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.anchor_row("Doe, John"), Some(13));
        assert_eq!(index.anchor_row("Roe, Jane"), Some(15));
        assert_eq!(index.anchor_row("Poe, Ed (Chief)"), Some(17));
        assert_eq!(index.anchor_row("Moe, Al"), None);
    }

    #[test]
    fn test_build_stops_at_first_blank() {
        let mut book = MemoryWorkbook::new();
        let id = roster(&mut book, "EAR_Jul_24", &["Doe, John"]);
        book.set(id, "B17", "Orphan, Row");

        let index = NameRowIndex::build(&book, id, &EarsLayout::default()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.anchor_row("Orphan, Row"), None);
    }

    #[test]
    fn test_bounded_scan_skips_blanks() {
        let mut book = MemoryWorkbook::new();
        let id = roster(&mut book, "EAR_Jul_24", &["Doe, John"]);
        book.set(id, "B17", "Orphan, Row");
        book.set(id, "B99", "Too, Far");
        let layout = EarsLayout {
            last_anchor_row: Some(21),
            ..EarsLayout::default()
        };

        let index = NameRowIndex::build(&book, id, &layout).unwrap();
        assert_eq!(index.anchor_row("Orphan, Row"), Some(17));
        assert_eq!(index.anchor_row("Too, Far"), None);
    }

    #[test]
    fn test_duplicate_name_maps_to_last_row() {
        let mut book = MemoryWorkbook::new();
        let id = roster(&mut book, "EAR_Jul_24", &["Doe, John", "Doe, John"]);

        let index = NameRowIndex::build(&book, id, &EarsLayout::default()).unwrap();
        assert_eq!(index.anchor_row("Doe, John"), Some(15));
    }

    #[test]
    fn test_shared_directory_uses_selected_sheet() {
        let mut book = MemoryWorkbook::new();
        let first = roster(&mut book, "EAR_Jun_24", &["Doe, John"]);
        let second = roster(&mut book, "EAR_Jul_24", &["Roe, Jane", "Doe, John"]);
        let mode = NameIndexMode::Shared {
            sheet: SheetSelector::Name("EAR_Jul_24".to_string()),
        };

        let directory = NameDirectory::build(&book, &mode, &EarsLayout::default()).unwrap();
        assert_eq!(directory.anchor_row(first, "Doe, John"), Some(15));
        assert_eq!(directory.anchor_row(second, "Doe, John"), Some(15));
    }

    #[test]
    fn test_shared_directory_missing_sheet_is_error() {
        let book = MemoryWorkbook::new();
        let result = NameDirectory::build(&book, &NameIndexMode::default(), &EarsLayout::default());
        assert!(matches!(result, Err(EngineError::WorksheetNotFound { .. })));
    }

    #[test]
    fn test_per_sheet_directory_tracks_layout_drift() {
        let mut book = MemoryWorkbook::new();
        let july = roster(&mut book, "EAR_Jul_24", &["Doe, John", "Roe, Jane"]);
        let august = roster(&mut book, "EAR_Aug_24", &["Roe, Jane", "Doe, John"]);
        for (id, month, end) in [(july, "July", "2024-07-31"), (august, "August", "2024-08-31")] {
            book.set(id, "C9", 2024.0);
            book.set(id, "C8", month);
            book.set(id, "G4", end);
        }

        let directory =
            NameDirectory::build(&book, &NameIndexMode::PerSheet, &EarsLayout::default()).unwrap();
        assert_eq!(directory.anchor_row(july, "Doe, John"), Some(13));
        assert_eq!(directory.anchor_row(august, "Doe, John"), Some(15));
    }
}
