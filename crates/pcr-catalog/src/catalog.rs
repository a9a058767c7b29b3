use serde::{Deserialize, Serialize};

/// A single normalized part row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Vendor part number as it appeared in the source, whitespace-trimmed.
    /// Never empty; rows with a blank part number are dropped at load.
    pub part_number: String,
    /// Unit weight in grams. `None` when the source cell was blank or
    /// non-numeric; such rows survive loading and fail only when used in a
    /// calculation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_weight_g: Option<f64>,
    /// Post-consumer recycled content percent. Absent means "treat as 0"
    /// at calculation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcr_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge: Option<String>,
}

/// Lookup key for a part number: trimmed and case-folded.
pub(crate) fn lookup_key(part: &str) -> String {
    part.trim().to_lowercase()
}

/// The in-memory part database: an ordered, immutable collection of records
/// plus load-time bookkeeping.
///
/// Part numbers are not required to be unique; [`Catalog::find`] returns the
/// first record in load order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub records: Vec<CatalogRecord>,
    /// Rows discarded at load for a blank part number.
    pub dropped_blank: usize,
    /// Retained rows whose unit weight failed numeric coercion.
    pub missing_weight: usize,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a part number to a record.
    ///
    /// Matching trims and case-folds both sides. A blank query never
    /// matches. Duplicate part numbers are legal; the first record in load
    /// order wins, deterministically.
    pub fn find(&self, part: &str) -> Option<&CatalogRecord> {
        let key = lookup_key(part);
        if key.is_empty() {
            return None;
        }
        self.records.iter().find(|r| lookup_key(&r.part_number) == key)
    }
}
