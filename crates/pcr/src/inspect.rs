use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pcr_catalog::{load_catalog, read_headers, resolve_columns, ColumnMap};
use serde::Serialize;

#[derive(Args, Debug)]
#[command(about = "Inspect a catalog source and its detected schema")]
pub struct InspectArgs {
    /// Catalog file to inspect
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    source: PathBuf,
    headers: Vec<String>,
    columns: ColumnMap,
    records: usize,
    dropped_blank_part_numbers: usize,
    rows_missing_unit_weight: usize,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let headers = read_headers(&args.file)?;
    // Resolve before loading so a schema problem is reported with the
    // detected header list rather than as a generic load failure.
    let columns = resolve_columns(&headers)?;
    let catalog = load_catalog(&args.file)?;

    let report = InspectReport {
        source: args.file,
        headers,
        columns,
        records: catalog.len(),
        dropped_blank_part_numbers: catalog.dropped_blank,
        rows_missing_unit_weight: catalog.missing_weight,
    };

    match args.format {
        OutputFormat::Human => print_human_readable(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn print_human_readable(report: &InspectReport) {
    println!("{}", "Catalog source".blue().bold());
    println!("File: {}", report.source.display());
    println!("Headers: {}", report.headers.join(", "));
    println!();

    println!("{}", "Column mapping".blue().bold());
    for column in report.columns.columns() {
        println!(
            "  {} <- {:?} (column {})",
            column.field.name().cyan(),
            column.header,
            column.index + 1
        );
    }
    println!();

    println!("{}", "Rows".blue().bold());
    println!("Records loaded: {}", report.records);
    if report.dropped_blank_part_numbers > 0 {
        println!(
            "Dropped (blank part number): {}",
            report.dropped_blank_part_numbers.to_string().yellow()
        );
    }
    if report.rows_missing_unit_weight > 0 {
        println!(
            "Missing unit weight (will fail at calculation): {}",
            report.rows_missing_unit_weight.to_string().yellow()
        );
    }
}
