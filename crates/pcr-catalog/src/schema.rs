//! Header normalization and canonical column resolution.
//!
//! Source spreadsheets come from several vendors and never agree on header
//! spelling ("Item Weight (g)", "item_weight-g", a header broken across two
//! lines). Every header is normalized once and matched against an ordered
//! alias table; the first alias present in the sheet wins for each field.

use serde::Serialize;
use thiserror::Error;

/// Canonical fields a catalog column can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PartNumber,
    Description,
    Gauge,
    UnitWeight,
    PcrPercent,
}

impl Field {
    /// Human-readable name used in error messages and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Field::PartNumber => "part number",
            Field::Description => "description",
            Field::Gauge => "gauge",
            Field::UnitWeight => "unit weight (g)",
            Field::PcrPercent => "PCR content %",
        }
    }

    /// Fields a source must provide for the catalog to be usable.
    pub const REQUIRED: &'static [Field] = &[Field::PartNumber, Field::UnitWeight];
}

/// Canonical field -> ordered, pre-normalized header aliases.
///
/// Order matters twice: fields are resolved in table order, and within a
/// field the first alias found in the sheet wins.
const FIELD_ALIASES: &[(Field, &[&str])] = &[
    (
        Field::PartNumber,
        &[
            "vendor part number",
            "vendor part no",
            "part number",
            "part no",
            "part #",
            "item number",
            "sku",
        ],
    ),
    (
        Field::Description,
        &["description", "item description", "part description"],
    ),
    (Field::Gauge, &["gauge", "gauge (mil)", "mil", "thickness"]),
    (
        Field::UnitWeight,
        &[
            "item weight (g)",
            "unit weight (g)",
            "weight (g)",
            "item weight g",
            "unit weight g",
            "unit weight grams",
            "weight grams",
        ],
    ),
    (
        Field::PcrPercent,
        &[
            "pcr content %",
            "pcr content",
            "pcr %",
            "% pcr",
            "recycled content %",
            "recycled content",
            "pcr",
        ],
    ),
];

/// Normalize a raw header cell for alias matching: trim, lowercase, and
/// collapse line breaks, hyphens, underscores and runs of whitespace into
/// single spaces.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.extend(ch.to_lowercase());
    }
    out
}

/// A canonical field resolved to a concrete source column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedColumn {
    pub field: Field,
    /// Header text as it appeared in the source.
    pub header: String,
    /// Zero-based column index in the source.
    pub index: usize,
}

/// Mapping from canonical fields to source columns for one sheet.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ColumnMap {
    columns: Vec<ResolvedColumn>,
}

impl ColumnMap {
    pub fn get(&self, field: Field) -> Option<&ResolvedColumn> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.get(field).map(|c| c.index)
    }

    /// Resolved columns in canonical field order.
    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error(
        "missing required column(s): {}; detected headers: [{}]",
        missing.join(", "),
        detected.join(", ")
    )]
    MissingRequiredColumns {
        /// Canonical names of the fields that could not be resolved.
        missing: Vec<String>,
        /// Every header found in the source, verbatim.
        detected: Vec<String>,
    },
}

/// Resolve raw source headers into a [`ColumnMap`].
///
/// Fails only when a required field ([`Field::REQUIRED`]) has no matching
/// header; optional fields simply stay unmapped.
pub fn resolve_columns(headers: &[String]) -> Result<ColumnMap, SchemaError> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let mut columns = Vec::new();
    for (field, aliases) in FIELD_ALIASES {
        let hit = aliases
            .iter()
            .find_map(|alias| normalized.iter().position(|h| h == alias));
        if let Some(index) = hit {
            columns.push(ResolvedColumn {
                field: *field,
                header: headers[index].trim().to_string(),
                index,
            });
        }
    }

    let map = ColumnMap { columns };
    let missing: Vec<String> = Field::REQUIRED
        .iter()
        .filter(|f| map.get(**f).is_none())
        .map(|f| f.name().to_string())
        .collect();

    if !missing.is_empty() {
        return Err(SchemaError::MissingRequiredColumns {
            missing,
            detected: headers.iter().map(|h| h.trim().to_string()).collect(),
        });
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Vendor Part Number "), "vendor part number");
        assert_eq!(normalize_header("Item\nWeight (g)"), "item weight (g)");
        assert_eq!(normalize_header("PCR-Content_%"), "pcr content %");
        assert_eq!(normalize_header("unit__weight--grams"), "unit weight grams");
        assert_eq!(normalize_header(""), "");
    }

    #[test]
    fn test_resolves_original_headers() {
        let map = resolve_columns(&headers(&[
            "Vendor Part Number",
            "Description",
            "Gauge",
            "Item Weight (g)",
            "PCR Content %",
        ]))
        .unwrap();

        assert_eq!(map.index_of(Field::PartNumber), Some(0));
        assert_eq!(map.index_of(Field::Description), Some(1));
        assert_eq!(map.index_of(Field::Gauge), Some(2));
        assert_eq!(map.index_of(Field::UnitWeight), Some(3));
        assert_eq!(map.index_of(Field::PcrPercent), Some(4));
    }

    #[test]
    fn test_alias_order_wins() {
        // Both "vendor part number" and "part number" are present; the
        // earlier alias takes the column even though it appears later.
        let map = resolve_columns(&headers(&[
            "Part Number",
            "Vendor Part Number",
            "Weight (g)",
        ]))
        .unwrap();
        assert_eq!(map.index_of(Field::PartNumber), Some(1));
    }

    #[test]
    fn test_optional_fields_stay_unmapped() {
        let map = resolve_columns(&headers(&["Part Number", "Weight (g)"])).unwrap();
        assert_eq!(map.index_of(Field::Description), None);
        assert_eq!(map.index_of(Field::PcrPercent), None);
        assert_eq!(map.columns().len(), 2);
    }

    #[test]
    fn test_missing_required_columns() {
        let err = resolve_columns(&headers(&["Description", "PCR Content %"])).unwrap_err();
        match &err {
            SchemaError::MissingRequiredColumns { missing, detected } => {
                assert_eq!(missing, &["part number", "unit weight (g)"]);
                assert_eq!(detected, &["Description", "PCR Content %"]);
            }
        }
        let msg = err.to_string();
        assert!(msg.contains("part number"));
        assert!(msg.contains("unit weight (g)"));
        assert!(msg.contains("Description"));
    }

    #[test]
    fn test_multiline_header_resolves() {
        let map = resolve_columns(&headers(&["Vendor\nPart Number", "Item\nWeight (g)"])).unwrap();
        assert_eq!(map.index_of(Field::PartNumber), Some(0));
        assert_eq!(map.index_of(Field::UnitWeight), Some(1));
    }
}
