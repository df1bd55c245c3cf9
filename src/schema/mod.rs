//! Canonical output schema and header normalization.
//!
//! Every header comparison in the crate goes through [`HeaderPolicy::normalize`]
//! so that matching rules live in data (alias variants, tier labels) rather than
//! in ad hoc string handling spread across the projector.

pub mod alias;
pub mod tier;

use serde::{Deserialize, Serialize};

/// Columns an output sheet may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "S/N")]
    SerialNumber,
    #[serde(rename = "TARIFF NAME")]
    TariffName,
    #[serde(rename = "PRICE")]
    Price,
    #[serde(rename = "SNOMED CODE")]
    SnomedCode,
    #[serde(rename = "SNOMED DESCRIPTION EN")]
    SnomedDescriptionEn,
}

/// Fixed output column order. Projections include a subset of these columns
/// and never reorder them.
pub const CANONICAL_SCHEMA: [CanonicalField; 5] = [
    CanonicalField::SerialNumber,
    CanonicalField::TariffName,
    CanonicalField::Price,
    CanonicalField::SnomedCode,
    CanonicalField::SnomedDescriptionEn,
];

impl CanonicalField {
    /// Header label written to output sheets.
    pub const fn label(self) -> &'static str {
        match self {
            CanonicalField::SerialNumber => "S/N",
            CanonicalField::TariffName => "TARIFF NAME",
            CanonicalField::Price => "PRICE",
            CanonicalField::SnomedCode => "SNOMED CODE",
            CanonicalField::SnomedDescriptionEn => "SNOMED DESCRIPTION EN",
        }
    }

    /// Whether source values of this field must be carried as text.
    pub const fn is_textual_code(self) -> bool {
        matches!(self, CanonicalField::SnomedCode)
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How raw header labels are collapsed into comparable form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPolicy {
    /// Trim surrounding whitespace and uppercase. Internal spaces are kept.
    #[default]
    TrimUppercase,
    /// Like `TrimUppercase`, but also drops every internal whitespace
    /// character, so `Line Items` and `LINEITEMS` compare equal.
    Compact,
}

impl HeaderPolicy {
    /// Normalizes a single header label. Total and idempotent.
    pub fn normalize(self, label: &str) -> String {
        let canonical = label.trim().to_uppercase();
        match self {
            HeaderPolicy::TrimUppercase => canonical,
            HeaderPolicy::Compact => canonical.chars().filter(|ch| !ch.is_whitespace()).collect(),
        }
    }

    /// Normalizes a header row, preserving column order and duplicates.
    pub fn normalize_all(self, headers: &[String]) -> Vec<String> {
        headers.iter().map(|header| self.normalize(header)).collect()
    }
}

/// Normalizes a header label with the default [`HeaderPolicy::TrimUppercase`].
pub fn normalize(label: &str) -> String {
    HeaderPolicy::TrimUppercase.normalize(label)
}

/// A source column selected by one of the resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumn<'a> {
    /// Zero-based position in the sheet's header row.
    pub index: usize,
    /// Normalized header label of the column.
    pub header: &'a str,
}
