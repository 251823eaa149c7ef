//! ears-fill CLI
//!
//! Populates an EARS workbook from the sources named in a site configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ears_fill::config::{ConfigLoader, SavePolicy};
use ears_fill::pipeline;
use ears_fill::store::XlsxWorkbook;

#[derive(Parser)]
#[command(name = "ears-fill")]
#[command(author, version, about = "Populate EARS attendance workbooks", long_about = None)]
struct Cli {
    /// Site configuration file
    #[arg(value_name = "CONFIG", default_value = "ears.yaml")]
    config: PathBuf,

    /// Write the run report as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Read everything and report, but never save the EARS workbook
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = ConfigLoader::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?
        .into_config();
    if cli.dry_run {
        config.save_policy = SavePolicy::Never;
    }

    let mut workbook = XlsxWorkbook::open(&config.ears.path)?;
    let report = pipeline::run(&config, &mut workbook)
        .with_context(|| format!("populating {}", config.ears.path.display()))?;

    println!(
        "{}: {} records, {} cells written, {} saves",
        report.site, report.records_processed, report.cells_written, report.saves
    );
    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic);
    }

    if let Some(path) = cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
