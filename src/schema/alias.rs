use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CanonicalField, HeaderPolicy, ResolvedColumn};

/// Canonical field → accepted source header variants.
///
/// Fields without an entry are matched by their own canonical label. `PRICE`
/// never goes through this table; it is always the resolved tier column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    variants: BTreeMap<CanonicalField, Vec<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut variants = BTreeMap::new();
        variants.insert(
            CanonicalField::TariffName,
            vec![
                "LINE ITEMS".to_string(),
                "LINE ITEM".to_string(),
                "LINEITEMS".to_string(),
                "LINEITEM".to_string(),
                "TARIFF NAME".to_string(),
            ],
        );
        variants.insert(
            CanonicalField::SnomedDescriptionEn,
            vec![
                "SNOMED DESCRIPTION EN".to_string(),
                "SNOMEDDESCRIPTIONEN".to_string(),
                "DESCRIPTION EN".to_string(),
            ],
        );
        Self { variants }
    }
}

impl AliasTable {
    /// Builds a table from an explicit mapping.
    pub fn new(variants: BTreeMap<CanonicalField, Vec<String>>) -> Self {
        Self { variants }
    }

    /// Fields that carry an explicit variant list.
    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.variants.keys().copied()
    }

    /// Accepted variants for `field`, as configured (not yet normalized).
    pub fn variants(&self, field: CanonicalField) -> Vec<&str> {
        match self.variants.get(&field) {
            Some(variants) => variants.iter().map(String::as_str).collect(),
            None => vec![field.label()],
        }
    }
}

/// Resolves descriptive fields against a sheet's normalized headers.
///
/// Built once per run from the configured [`AliasTable`]; all variants are
/// normalized up front with the run's [`HeaderPolicy`].
#[derive(Debug, Clone)]
pub struct AliasResolver {
    variants: BTreeMap<CanonicalField, Vec<String>>,
}

impl AliasResolver {
    pub fn new(table: &AliasTable, policy: HeaderPolicy) -> Self {
        let variants = [
            CanonicalField::SerialNumber,
            CanonicalField::TariffName,
            CanonicalField::SnomedCode,
            CanonicalField::SnomedDescriptionEn,
        ]
        .into_iter()
        .map(|field| {
            let normalized: Vec<String> = table
                .variants(field)
                .into_iter()
                .map(|variant| policy.normalize(variant))
                .filter(|variant| !variant.is_empty())
                .collect();
            (field, normalized)
        })
        .collect();

        Self { variants }
    }

    /// Returns the leftmost header that is an accepted variant of `field`.
    ///
    /// Column order decides, not the order of the variant list: with both
    /// `LINEITEM` and `LINE ITEMS` present, whichever comes first in the sheet
    /// wins.
    pub fn resolve_field<'a>(
        &self,
        field: CanonicalField,
        normalized_headers: &'a [String],
    ) -> Option<ResolvedColumn<'a>> {
        let accepted = self.variants.get(&field)?;
        normalized_headers
            .iter()
            .enumerate()
            .find(|(_, header)| accepted.iter().any(|variant| variant == *header))
            .map(|(index, header)| ResolvedColumn {
                index,
                header: header.as_str(),
            })
    }
}
