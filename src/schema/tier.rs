use serde::{Deserialize, Serialize};

use super::{HeaderPolicy, ResolvedColumn};

/// Labels of the pricing tiers split out by default, in output order.
pub const DEFAULT_TIERS: [&str; 5] = ["Tier 0", "Tier 1", "Tier 2", "Tier 3", "Tier 4"];

/// A pricing tier, identified by its display label (e.g. `Tier 2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier {
    label: String,
}

impl Tier {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The default tier set, `Tier 0` through `Tier 4`.
    pub fn defaults() -> Vec<Tier> {
        DEFAULT_TIERS.iter().map(|label| Tier::new(*label)).collect()
    }

    /// Label as configured; used for output file names.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Normalized label that a tier price column must start with.
    pub fn prefix(&self, policy: HeaderPolicy) -> String {
        policy.normalize(&self.label)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// How a tier prefix is compared with a normalized header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierMatch {
    /// Header must start with the tier prefix. Tolerates trailing footnote
    /// markers such as `TIER 4*`, but also accepts `TIER 40`.
    #[default]
    Prefix,
    /// Header must equal the tier prefix.
    Exact,
}

/// Finds the price column for a tier on a sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierColumnResolver {
    policy: HeaderPolicy,
    mode: TierMatch,
}

impl TierColumnResolver {
    pub fn new(policy: HeaderPolicy, mode: TierMatch) -> Self {
        Self { policy, mode }
    }

    /// Returns the leftmost header matching the tier's prefix.
    ///
    /// When several headers match (e.g. `TIER 4` and `TIER 4 OVERRIDE`), the
    /// leftmost is chosen. Callers wanting a different column must filter the
    /// headers first or switch to [`TierMatch::Exact`].
    pub fn resolve_tier_column<'a>(
        &self,
        tier: &Tier,
        normalized_headers: &'a [String],
    ) -> Option<ResolvedColumn<'a>> {
        let prefix = tier.prefix(self.policy);
        if prefix.is_empty() {
            return None;
        }

        normalized_headers
            .iter()
            .enumerate()
            .find(|(_, header)| match self.mode {
                TierMatch::Prefix => header.starts_with(&prefix),
                TierMatch::Exact => **header == prefix,
            })
            .map(|(index, header)| ResolvedColumn {
                index,
                header: header.as_str(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(labels: &[&str], policy: HeaderPolicy) -> Vec<String> {
        labels.iter().map(|label| policy.normalize(label)).collect()
    }

    #[test]
    fn prefix_match_tolerates_trailing_noise() {
        let resolver = TierColumnResolver::default();
        let tier = Tier::new("Tier 4");
        for label in ["Tier 4", "TIER 4 ", "tier 4*", "Tier 4 (KES)"] {
            let headers = normalized(&["S/N", label], HeaderPolicy::TrimUppercase);
            let resolved = resolver.resolve_tier_column(&tier, &headers);
            assert_eq!(resolved.map(|column| column.index), Some(1), "{label}");
        }
    }

    #[test]
    fn internal_noise_is_not_tolerated_by_default_policy() {
        let resolver = TierColumnResolver::default();
        let headers = normalized(&["TIER4", "Tier  4"], HeaderPolicy::TrimUppercase);
        assert!(resolver
            .resolve_tier_column(&Tier::new("Tier 4"), &headers)
            .is_none());
    }

    #[test]
    fn compact_policy_matches_spaceless_headers() {
        let resolver = TierColumnResolver::new(HeaderPolicy::Compact, TierMatch::Prefix);
        let headers = normalized(&["S/N", "TIER4"], HeaderPolicy::Compact);
        let resolved = resolver
            .resolve_tier_column(&Tier::new("Tier 4"), &headers)
            .unwrap();
        assert_eq!(resolved, ResolvedColumn { index: 1, header: "TIER4" });
    }

    #[test]
    fn leftmost_matching_column_wins() {
        let resolver = TierColumnResolver::default();
        let headers = normalized(
            &["Tier 2 override", "Tier 2", "Tier 3"],
            HeaderPolicy::TrimUppercase,
        );
        let resolved = resolver
            .resolve_tier_column(&Tier::new("Tier 2"), &headers)
            .unwrap();
        assert_eq!(resolved.header, "TIER 2 OVERRIDE");
    }

    #[test]
    fn exact_mode_skips_decorated_headers() {
        let resolver = TierColumnResolver::new(HeaderPolicy::TrimUppercase, TierMatch::Exact);
        let headers = normalized(
            &["Tier 2 override", "Tier 2 ", "Tier 20"],
            HeaderPolicy::TrimUppercase,
        );
        let resolved = resolver
            .resolve_tier_column(&Tier::new("Tier 2"), &headers)
            .unwrap();
        assert_eq!(resolved.index, 1);
    }

    #[test]
    fn prefix_mode_accepts_longer_tier_numbers() {
        let resolver = TierColumnResolver::default();
        let headers = normalized(&["Tier 10"], HeaderPolicy::TrimUppercase);
        assert!(resolver
            .resolve_tier_column(&Tier::new("Tier 1"), &headers)
            .is_some());
    }

    #[test]
    fn blank_tier_label_never_matches() {
        let resolver = TierColumnResolver::default();
        let headers = normalized(&["Tier 1"], HeaderPolicy::TrimUppercase);
        assert!(resolver.resolve_tier_column(&Tier::new("  "), &headers).is_none());
    }

    #[test]
    fn defaults_are_ordered_tier_zero_to_four() {
        let labels: Vec<String> = Tier::defaults()
            .iter()
            .map(|tier| tier.label().to_string())
            .collect();
        assert_eq!(labels, DEFAULT_TIERS);
    }
}
