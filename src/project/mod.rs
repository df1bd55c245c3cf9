use tracing::{debug, trace};

use crate::config::SplitterConfig;
use crate::model::{ProjectedSheet, RawSheet};
use crate::schema::alias::AliasResolver;
use crate::schema::tier::{Tier, TierColumnResolver};
use crate::schema::{CANONICAL_SCHEMA, CanonicalField, HeaderPolicy, ResolvedColumn};

/// A canonical output column and the source column it is copied from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedColumn {
    pub field: CanonicalField,
    /// Zero-based source column index.
    pub index: usize,
    /// Normalized source header.
    pub source_header: String,
}

/// Source → canonical column mapping for one sheet and one tier, in schema
/// order. Always contains `PRICE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub columns: Vec<PlannedColumn>,
}

impl ColumnPlan {
    pub fn fields(&self) -> Vec<CanonicalField> {
        self.columns.iter().map(|column| column.field).collect()
    }

    pub fn get(&self, field: CanonicalField) -> Option<&PlannedColumn> {
        self.columns.iter().find(|column| column.field == field)
    }
}

/// Projects raw sheets onto the canonical schema for a given tier.
///
/// The projector owns the resolvers compiled from the run configuration and can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct SheetProjector {
    policy: HeaderPolicy,
    aliases: AliasResolver,
    tier_columns: TierColumnResolver,
}

impl SheetProjector {
    pub fn new(config: &SplitterConfig) -> Self {
        Self {
            policy: config.header_policy,
            aliases: AliasResolver::new(&config.aliases, config.header_policy),
            tier_columns: TierColumnResolver::new(config.header_policy, config.tier_match),
        }
    }

    /// Decides which source column feeds each canonical field.
    ///
    /// Returns `None` when the sheet has no column for `tier`; every other
    /// field is optional and is simply left out of the plan when absent.
    pub fn plan(&self, headers: &[String], tier: &Tier) -> Option<ColumnPlan> {
        let normalized = self.policy.normalize_all(headers);
        let price = self.tier_columns.resolve_tier_column(tier, &normalized)?;

        let columns = CANONICAL_SCHEMA
            .into_iter()
            .filter_map(|field| {
                let resolved = match field {
                    CanonicalField::Price => Some(price),
                    other => self.aliases.resolve_field(other, &normalized),
                };
                resolved.map(|ResolvedColumn { index, header }| PlannedColumn {
                    field,
                    index,
                    source_header: header.to_string(),
                })
            })
            .collect();

        Some(ColumnPlan { columns })
    }

    /// Projects `sheet` for `tier`, or returns `None` when the sheet does not
    /// contribute to that tier.
    ///
    /// The tier column is renamed to `PRICE`; `SNOMED CODE` values are carried
    /// as text. The projected sheet keeps the source sheet's full name.
    pub fn project(&self, sheet: &RawSheet, tier: &Tier) -> Option<ProjectedSheet> {
        let Some(plan) = self.plan(&sheet.headers, tier) else {
            debug!(sheet = %sheet.name, %tier, "no tier column, sheet skipped");
            return None;
        };

        if let Some(price) = plan.get(CanonicalField::Price) {
            trace!(
                sheet = %sheet.name,
                %tier,
                column = %price.source_header,
                "tier column resolved"
            );
        }

        let rows = (0..sheet.rows.len())
            .map(|row| {
                plan.columns
                    .iter()
                    .map(|column| {
                        let value = sheet.cell(row, column.index);
                        if column.field.is_textual_code() {
                            value.to_text()
                        } else {
                            value
                        }
                    })
                    .collect()
            })
            .collect();

        Some(ProjectedSheet {
            sheet_name: sheet.name.clone(),
            columns: plan.fields(),
            rows,
        })
    }
}
