//! The populate run.
//!
//! A [`Populator`] owns the per-run state: the name indexes, the mapping helpers
//! and the [`RunReport`]. Each assignment is expanded into half-day slots, and
//! every slot resolves its own monthly sheet, so an overnight shift that crosses
//! a month end lands on both sheets. Recoverable problems become diagnostics
//! and the run continues.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::{RunConfig, SavePolicy};
use crate::error::EngineResult;
use crate::mapping::{
    CellAddressMapper, DateSheetResolver, Expansion, NameDirectory, classify_optional, expand,
    find_overlaps,
};
use crate::models::{Diagnostic, RunReport, ShiftAssignment};
use crate::source::load_assignments;
use crate::store::WorkbookStore;

/// Writes assignments into an EARS workbook.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use ears_fill::config::RunConfig;
/// use ears_fill::models::{Schedule, ShiftAssignment};
/// use ears_fill::pipeline::Populator;
/// use ears_fill::store::MemoryWorkbook;
///
/// let mut book = MemoryWorkbook::new();
/// let july = book.add_sheet("EAR_Jul_24");
/// book.set(july, "C9", 2024.0);
/// book.set(july, "C8", "July");
/// book.set(july, "G4", NaiveDate::from_ymd_opt(2024, 7, 31).unwrap());
/// book.set(july, "B13", "Doe, John");
///
/// let mut config = RunConfig::default();
/// config.ears.name_index = ears_fill::config::NameIndexMode::PerSheet;
///
/// let mut populator = Populator::new(&mut book, &config).unwrap();
/// populator
///     .apply(&ShiftAssignment {
///         trainee: "Doe, John".to_string(),
///         schedule: Schedule::Block {
///             start: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
///             end: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
///         },
///         rotation: Some("Inpatient".to_string()),
///         source_row: Some(2),
///     })
///     .unwrap();
/// let report = populator.finish().unwrap();
///
/// assert_eq!(report.cells_written, 2);
/// assert_eq!(book.text(july, "I13").as_deref(), Some("P"));
/// assert_eq!(book.text(july, "I14").as_deref(), Some("P"));
/// ```
pub struct Populator<'a, S: WorkbookStore> {
    store: &'a mut S,
    config: &'a RunConfig,
    resolver: DateSheetResolver<'a>,
    mapper: CellAddressMapper,
    names: NameDirectory,
    report: RunReport,
}

impl<'a, S: WorkbookStore> Populator<'a, S> {
    /// Prepares a run: builds the name indexes and audits the monthly sheets for
    /// overlapping date ranges.
    ///
    /// # Errors
    ///
    /// Fails when the workbook cannot be read or the shared name index sheet
    /// does not exist.
    pub fn new(store: &'a mut S, config: &'a RunConfig) -> EngineResult<Self> {
        let layout = &config.ears.layout;
        let resolver = DateSheetResolver::new(layout);
        let names = NameDirectory::build(&*store, &config.ears.name_index, layout)?;

        let mut report = RunReport::new(config.site.as_str());
        let sheets = resolver.monthly_sheets(&*store)?;
        info!(
            run_id = %report.run_id,
            site = %config.site,
            monthly_sheets = sheets.len(),
            "Starting populate run"
        );
        for diagnostic in find_overlaps(&sheets) {
            warn!(run_id = %report.run_id, diagnostic = %diagnostic, "Overlapping monthly sheets");
            report.push(diagnostic);
        }

        Ok(Self {
            store,
            config,
            resolver,
            mapper: CellAddressMapper::new(layout.first_day_column),
            names,
            report,
        })
    }

    /// Returns the report so far.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        warn!(
            run_id = %self.report.run_id,
            kind = %diagnostic.kind,
            trainee = diagnostic.trainee.as_deref().unwrap_or(""),
            "{}",
            diagnostic.message
        );
        self.report.push(diagnostic);
    }

    /// Records diagnostics produced outside the populator, such as unreadable
    /// source rows.
    pub fn record_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.record(diagnostic);
        }
    }

    /// Writes one assignment.
    ///
    /// A missing sheet or name skips the affected slots and records a diagnostic
    /// once per date.
    ///
    /// # Errors
    ///
    /// Fails only on workbook I/O errors.
    pub fn apply(&mut self, assignment: &ShiftAssignment) -> EngineResult<()> {
        self.report.records_processed += 1;
        let trainee = assignment.trainee.as_str();

        let slots = match expand(&assignment.schedule, &self.config.shift_bands) {
            Expansion::Covered(slots) => slots,
            Expansion::Skipped => return Ok(()),
            Expansion::Unrecognized { hours, start } => {
                self.record(Diagnostic::unrecognized_shift_length(trainee, hours, start));
                return Ok(());
            }
        };

        let code = classify_optional(assignment.rotation.as_deref());
        let mut reported: Option<NaiveDate> = None;

        for slot in slots {
            let Some(sheet) = self.resolver.resolve(&*self.store, slot.date)? else {
                if reported != Some(slot.date) {
                    reported = Some(slot.date);
                    self.record(Diagnostic::sheet_not_found(trainee, slot.date));
                }
                continue;
            };

            let cell = self
                .names
                .index_for(sheet.id)
                .and_then(|index| self.mapper.locate(index, trainee, slot.date.day(), slot.half));
            let Some(cell) = cell else {
                if reported != Some(slot.date) {
                    reported = Some(slot.date);
                    self.record(Diagnostic::name_not_found(trainee, &sheet.name, slot.date));
                }
                continue;
            };

            self.store.write(sheet.id, cell, code.code())?;
            self.report.cells_written += 1;
            debug!(sheet = %sheet.name, cell = %cell, code = code.code(), "Wrote cell");

            if self.config.save_policy == SavePolicy::EachWrite {
                self.save()?;
            }
        }

        Ok(())
    }

    /// Writes every assignment in order.
    pub fn populate(&mut self, assignments: &[ShiftAssignment]) -> EngineResult<()> {
        for assignment in assignments {
            self.apply(assignment)?;
        }
        Ok(())
    }

    fn save(&mut self) -> EngineResult<()> {
        self.store.save()?;
        self.report.saves += 1;
        Ok(())
    }

    /// Ends the run, saving the workbook under the end-of-run policy when
    /// anything was written.
    pub fn finish(mut self) -> EngineResult<RunReport> {
        if self.config.save_policy == SavePolicy::EndOfRun && self.report.cells_written > 0 {
            self.save()?;
        }
        info!(
            run_id = %self.report.run_id,
            records = self.report.records_processed,
            cells_written = self.report.cells_written,
            saves = self.report.saves,
            diagnostics = self.report.diagnostics.len(),
            "Populate run finished"
        );
        Ok(self.report)
    }
}

/// Runs every configured source into `store`.
///
/// Sources are processed in configuration order; later writes to the same
/// cell overwrite earlier ones.
///
/// # Errors
///
/// Fails when a source workbook or the EARS workbook cannot be read or saved.
pub fn run<S: WorkbookStore>(config: &RunConfig, store: &mut S) -> EngineResult<RunReport> {
    let mut populator = Populator::new(store, config)?;
    let run_id = populator.report().run_id;

    for source in &config.sources {
        info!(
            run_id = %run_id,
            kind = source.kind(),
            path = %source.path().display(),
            "Reading source"
        );
        let batch = load_assignments(source)?;
        info!(
            run_id = %run_id,
            kind = source.kind(),
            assignments = batch.assignments.len(),
            skipped_rows = batch.diagnostics.len(),
            "Source loaded"
        );
        populator.record_all(batch.diagnostics);
        populator.populate(&batch.assignments)?;
    }

    populator.finish()
}
