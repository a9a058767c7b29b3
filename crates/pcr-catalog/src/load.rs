//! Catalog ingestion from delimited files and Excel workbooks.
//!
//! The whole source is read into memory, headers go through the schema
//! resolver, and rows are projected into [`CatalogRecord`]s. Structural
//! problems (unreadable file, unresolvable required columns) fail the whole
//! load; per-row numeric defects never do.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogRecord};
use crate::schema::{resolve_columns, Field, SchemaError};

/// Errors that abort a catalog load. No partial catalog is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse delimited file: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no sheets")]
    EmptyWorkbook,

    #[error("unsupported source extension {0:?} (expected csv, tsv, txt, xlsx or xls)")]
    UnsupportedExtension(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

enum SourceKind {
    Delimited(u8),
    Workbook,
}

fn source_kind(path: &Path) -> Result<SourceKind, LoadError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => Ok(SourceKind::Delimited(b',')),
        "tsv" | "txt" => Ok(SourceKind::Delimited(b'\t')),
        "xlsx" | "xlsm" | "xlsb" | "xls" => Ok(SourceKind::Workbook),
        _ => Err(LoadError::UnsupportedExtension(ext)),
    }
}

/// Load a catalog from a delimited file or Excel workbook.
///
/// Rows with a blank part number are dropped. Rows whose unit weight is
/// blank or non-numeric are retained with `unit_weight_g: None` and fail
/// only when that part is actually used in a calculation.
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    match source_kind(path)? {
        SourceKind::Delimited(delimiter) => load_delimited(path, delimiter),
        SourceKind::Workbook => load_workbook(path),
    }
}

/// Read just the header row of a source, verbatim. Used by inspection
/// tooling; goes through the same dispatch as [`load_catalog`].
pub fn read_headers(path: &Path) -> Result<Vec<String>, LoadError> {
    match source_kind(path)? {
        SourceKind::Delimited(delimiter) => {
            let mut reader = csv::ReaderBuilder::new()
                .delimiter(delimiter)
                .flexible(true)
                .from_path(path)?;
            Ok(reader.headers()?.iter().map(|h| h.to_string()).collect())
        }
        SourceKind::Workbook => {
            let range = first_sheet(path)?;
            Ok(range
                .rows()
                .next()
                .map(|row| row.iter().map(cell_to_string).collect())
                .unwrap_or_default())
        }
    }
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<Catalog, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    build_catalog(&headers, rows)
}

fn load_workbook(path: &Path) -> Result<Catalog, LoadError> {
    let range = first_sheet(path)?;
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<String>> = rows.map(|row| row.iter().map(cell_to_string).collect()).collect();
    build_catalog(&headers, rows)
}

fn first_sheet(path: &Path) -> Result<calamine::Range<Data>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptyWorkbook)?
        .map_err(LoadError::from)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // Float/Int/Bool/DateTime render via Display; integral floats print
        // without a trailing ".0", so numeric part numbers survive intact.
        other => other.to_string(),
    }
}

/// Coerce a spreadsheet cell to a number. Tolerates surrounding whitespace,
/// a single trailing percent sign, and commas at three-digit thousands
/// positions; anything else non-numeric is an explicit absence, never zero.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let mut cleaned = raw.trim();
    if let Some(stripped) = cleaned.strip_suffix('%') {
        cleaned = stripped.trim_end();
    }
    if cleaned.is_empty() {
        return None;
    }
    strip_thousands_separators(cleaned)?.parse().ok()
}

/// Remove thousands separators, but only when every comma sits at a proper
/// three-digit group boundary in the integer part. Misplaced commas make the
/// whole cell non-numeric rather than silently collapsing ("1,2,3" is not
/// 123).
fn strip_thousands_separators(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    if frac_part.is_some_and(|f| f.contains(',')) {
        return None;
    }
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let groups: Vec<&str> = digits.split(',').collect();
    let all_digits = |g: &str| g.chars().all(|c| c.is_ascii_digit());
    let well_formed = !groups[0].is_empty()
        && groups[0].len() <= 3
        && all_digits(groups[0])
        && groups[1..].iter().all(|g| g.len() == 3 && all_digits(g));
    if !well_formed {
        return None;
    }
    let joined = groups.concat();
    Some(match frac_part {
        Some(f) => format!("{sign}{joined}.{f}"),
        None => format!("{sign}{joined}"),
    })
}

fn build_catalog(headers: &[String], rows: Vec<Vec<String>>) -> Result<Catalog, LoadError> {
    let map = resolve_columns(headers)?;
    let mut catalog = Catalog::default();

    for (row_idx, cells) in rows.into_iter().enumerate() {
        let cell = |field: Field| -> &str {
            map.index_of(field)
                .and_then(|i| cells.get(i))
                .map(|s| s.trim())
                .unwrap_or("")
        };

        let part_number = cell(Field::PartNumber).to_string();
        if part_number.is_empty() {
            catalog.dropped_blank += 1;
            continue;
        }

        let weight_raw = cell(Field::UnitWeight);
        let unit_weight_g = parse_number(weight_raw);
        if unit_weight_g.is_none() {
            catalog.missing_weight += 1;
            log::warn!(
                "row {}: part {part_number}: unit weight {weight_raw:?} is not numeric; \
                 the part will fail at calculation time",
                row_idx + 2
            );
        }

        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        catalog.records.push(CatalogRecord {
            part_number,
            unit_weight_g,
            pcr_percent: parse_number(cell(Field::PcrPercent)),
            description: non_empty(cell(Field::Description)),
            gauge: non_empty(cell(Field::Gauge)),
        });
    }

    log::debug!(
        "loaded {} record(s) ({} blank part number(s) dropped, {} missing weight(s) retained)",
        catalog.len(),
        catalog.dropped_blank,
        catalog.missing_weight
    );
    Ok(catalog)
}
