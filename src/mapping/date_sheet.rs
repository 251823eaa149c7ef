//! Resolution of calendar dates to monthly EARS sheets.
//!
//! Each monthly sheet labels itself with a year cell, a month-name cell and an
//! explicit last-covered date. A sheet covers the dates from the first of its
//! labelled month through that last date. Resolution scans sheets in workbook
//! order on every call and returns the first sheet whose range contains the
//! date.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::EarsLayout;
use crate::error::EngineResult;
use crate::models::Diagnostic;
use crate::store::{SheetId, WorkbookStore};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parses an English month name (any case, surrounding whitespace ignored).
///
/// # Example
///
/// ```
/// use ears_fill::mapping::month_number;
///
/// assert_eq!(month_number("July"), Some(7));
/// assert_eq!(month_number(" AUGUST "), Some(8));
/// assert_eq!(month_number("Jul"), None);
/// ```
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|index| index as u32 + 1)
}

/// A monthly sheet and the dates it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySheet {
    /// The sheet's handle.
    pub id: SheetId,
    /// The sheet's display name.
    pub name: String,
    /// The labelled year.
    pub year: i32,
    /// The labelled month (1-12).
    pub month: u32,
    /// The first of the labelled month.
    pub first_day: NaiveDate,
    /// The explicit last-covered date.
    pub last_day: NaiveDate,
}

impl MonthlySheet {
    /// Returns true when `date` falls within the sheet's range, inclusive.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }
}

/// Finds the monthly sheet covering a date.
#[derive(Debug, Clone, Copy)]
pub struct DateSheetResolver<'a> {
    layout: &'a EarsLayout,
}

impl<'a> DateSheetResolver<'a> {
    /// Creates a resolver for sheets laid out as `layout`.
    pub fn new(layout: &'a EarsLayout) -> Self {
        Self { layout }
    }

    /// Reads a sheet's labels.
    ///
    /// Returns `Ok(None)` for excluded sheets and for sheets whose labels are
    /// missing or unreadable.
    pub fn read_sheet<S: WorkbookStore>(
        &self,
        store: &S,
        id: SheetId,
    ) -> EngineResult<Option<MonthlySheet>> {
        let name = store.sheet_name(id)?;
        if self.layout.is_excluded(name) {
            return Ok(None);
        }

        let year = store
            .read(id, self.layout.year_cell)?
            .as_i64()
            .and_then(|y| i32::try_from(y).ok());
        let month = store
            .read(id, self.layout.month_cell)?
            .as_text()
            .and_then(|m| month_number(&m));
        let last_day = store.read(id, self.layout.end_date_cell)?.as_date();

        let (Some(year), Some(month), Some(last_day)) = (year, month, last_day) else {
            debug!(sheet = name, "skipping sheet without readable year/month/end labels");
            return Ok(None);
        };
        let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
            debug!(sheet = name, year, month, "skipping sheet with impossible first day");
            return Ok(None);
        };

        Ok(Some(MonthlySheet {
            id,
            name: name.to_string(),
            year,
            month,
            first_day,
            last_day,
        }))
    }

    /// Returns the first sheet, in workbook order, whose range covers `date`.
    ///
    /// Sheets labelled with a different year than `date` are never considered.
    pub fn resolve<S: WorkbookStore>(
        &self,
        store: &S,
        date: NaiveDate,
    ) -> EngineResult<Option<MonthlySheet>> {
        for id in store.sheet_ids() {
            if let Some(sheet) = self.read_sheet(store, id)? {
                if sheet.year == date.year() && sheet.covers(date) {
                    return Ok(Some(sheet));
                }
            }
        }
        Ok(None)
    }

    /// Resolves a date given as its parts. An impossible date resolves to nothing.
    pub fn resolve_ymd<S: WorkbookStore>(
        &self,
        store: &S,
        year: i32,
        month: u32,
        day: u32,
    ) -> EngineResult<Option<MonthlySheet>> {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => self.resolve(store, date),
            None => Ok(None),
        }
    }

    /// Returns every readable monthly sheet, in workbook order.
    pub fn monthly_sheets<S: WorkbookStore>(&self, store: &S) -> EngineResult<Vec<MonthlySheet>> {
        let mut sheets = Vec::new();
        for id in store.sheet_ids() {
            if let Some(sheet) = self.read_sheet(store, id)? {
                sheets.push(sheet);
            }
        }
        Ok(sheets)
    }
}

/// Reports every pair of monthly sheets whose ranges share a date.
///
/// The diagnostic names the first shared date. Resolution still picks the
/// earlier sheet; the audit only makes the ambiguity visible.
pub fn find_overlaps(sheets: &[MonthlySheet]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (i, first) in sheets.iter().enumerate() {
        for second in &sheets[i + 1..] {
            let shared_start = first.first_day.max(second.first_day);
            let shared_end = first.last_day.min(second.last_day);
            if shared_start <= shared_end {
                diagnostics.push(Diagnostic::overlapping_sheets(
                    &first.name,
                    &second.name,
                    shared_start,
                ));
            }
        }
    }
    diagnostics
}
