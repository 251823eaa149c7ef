//! Configuration loading for a populate run.
//!
//! A run is described by one YAML file per site naming the EARS workbook, the
//! source schedules to copy into it, and any layout overrides.
//!
//! # Example
//!
//! ```no_run
//! use ears_fill::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/bmc.yaml").unwrap();
//! println!("Loaded site: {}", config.config().site);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BlockColumns, BlockGridLayout, ClinicGridLayout, EarsConfig, EarsLayout, NameIndexMode,
    RunConfig, SavePolicy, SheetSelector, ShiftBands, SourceConfig, TimedColumns,
};
