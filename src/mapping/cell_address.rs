//! Cell addressing on a monthly sheet.

use crate::models::{CellRef, ShiftHalf};

use super::name_index::NameRowIndex;

/// Computes the grid cell for a (day, half, trainee) triple.
///
/// Day `d` lives in column `first_day_column + d - 1`; the AM entry is on the
/// trainee's anchor row and the PM entry on the row below.
///
/// # Example
///
/// ```
/// use ears_fill::mapping::CellAddressMapper;
/// use ears_fill::models::ShiftHalf;
///
/// let mapper = CellAddressMapper::default();
/// assert_eq!(mapper.cell_for(1, ShiftHalf::Am, 13).to_string(), "I13");
/// assert_eq!(mapper.cell_for(19, ShiftHalf::Pm, 13).to_string(), "AA14");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddressMapper {
    first_day_column: u32,
}

impl Default for CellAddressMapper {
    fn default() -> Self {
        Self::new(9)
    }
}

impl CellAddressMapper {
    /// Creates a mapper whose day 1 is in `first_day_column` (1-indexed).
    pub fn new(first_day_column: u32) -> Self {
        Self { first_day_column }
    }

    /// Returns the cell for `day` (1-31) and `half` of the trainee anchored at
    /// `anchor_row`.
    pub fn cell_for(&self, day: u32, half: ShiftHalf, anchor_row: u32) -> CellRef {
        let row = match half {
            ShiftHalf::Am => anchor_row,
            ShiftHalf::Pm => anchor_row + 1,
        };
        CellRef::new(self.first_day_column + day - 1, row)
    }

    /// Looks `name` up in `index` and returns its cell, or `None` when the name
    /// is not on the sheet.
    pub fn locate(
        &self,
        index: &NameRowIndex,
        name: &str,
        day: u32,
        half: ShiftHalf,
    ) -> Option<CellRef> {
        index
            .anchor_row(name)
            .map(|anchor| self.cell_for(day, half, anchor))
    }
}
