//! Impression report binary.
//!
//! Reads a JSON export of impression records and prints the dashboard report
//! (timeline, step chart and sorted journey table) as pretty JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! impression-report records.json
//! impression-report records.json --config dashboard.toml --sort treatment:asc
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)
//! - `IMPRESSION_TICK_COUNT`, `IMPRESSION_CHANGE_POINT`, `IMPRESSION_MAX_DAYS`:
//!   configuration overrides

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use impression_timeline::routes::journey::SortSpec;
use impression_timeline::services::{build_report, parse_records};
use impression_timeline::DashboardConfig;

#[derive(Parser, Debug)]
#[command(
    name = "impression-report",
    about = "Build the impression dashboard report from a JSON export"
)]
struct Cli {
    /// JSON export: an array of records, or an object with a `records` list.
    records: PathBuf,
    /// Dashboard TOML configuration (default: dashboard.toml search path).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Journey table sort as `column[:asc|desc]`.
    #[arg(long)]
    sort: Option<SortSpec>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(sort) = args.sort {
        config.table.default_column = sort.column;
        config.table.default_direction = sort.direction;
    }

    let json = fs::read_to_string(&args.records)
        .with_context(|| format!("failed to read {}", args.records.display()))?;
    let records = parse_records(&json)?;
    info!(
        "Loaded {} records from {}",
        records.len(),
        args.records.display()
    );

    let report = build_report(&records, &config);
    if !report.timeline.rejected.is_empty() {
        info!("{} records rejected", report.timeline.rejected.len());
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
