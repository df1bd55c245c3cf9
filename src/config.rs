//! Run configuration for the splitter.
//!
//! A [`SplitterConfig`] is built once (defaults, or a JSON file passed with
//! `--config`), validated, and then passed by reference through every stage.
//! Missing JSON fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};
use crate::schema::alias::AliasTable;
use crate::schema::tier::{Tier, TierMatch};
use crate::schema::{CanonicalField, HeaderPolicy};

/// Longest sheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Archive file name used when none is given on the command line.
pub const DEFAULT_ARCHIVE_NAME: &str = "RH_Tiers_Workbooks.zip";

/// What happens when two source sheets truncate to the same output name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later sheet replaces the earlier one in place.
    #[default]
    LastWriteWins,
    /// The later sheet is kept under a `_1`, `_2`, ... suffixed name.
    Suffix,
}

/// Settings shared by every stage of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitterConfig {
    /// Tiers to split out, in output order.
    pub tiers: Vec<Tier>,
    /// Accepted source variants per descriptive field.
    pub aliases: AliasTable,
    /// Maximum output sheet name length, in characters.
    pub sheet_name_limit: usize,
    pub header_policy: HeaderPolicy,
    pub tier_match: TierMatch,
    pub sheet_name_collisions: CollisionPolicy,
    /// Extension used in tier workbook file names.
    pub file_extension: String,
    /// Default archive name when writing a zip.
    pub archive_name: String,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            tiers: Tier::defaults(),
            aliases: AliasTable::default(),
            sheet_name_limit: MAX_SHEET_NAME_LEN,
            header_policy: HeaderPolicy::default(),
            tier_match: TierMatch::default(),
            sheet_name_collisions: CollisionPolicy::default(),
            file_extension: "xlsx".to_string(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

impl SplitterConfig {
    /// Loads and validates a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json(source: &str) -> Result<Self> {
        let config: SplitterConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the core relies on.
    pub fn validate(&self) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(ToolError::InvalidConfig("at least one tier is required".into()));
        }

        let mut seen = Vec::with_capacity(self.tiers.len());
        for tier in &self.tiers {
            let prefix = tier.prefix(self.header_policy);
            if prefix.is_empty() {
                return Err(ToolError::InvalidConfig(format!(
                    "tier label '{tier}' is blank after normalization"
                )));
            }
            if seen.contains(&prefix) {
                return Err(ToolError::InvalidConfig(format!(
                    "tier '{tier}' is listed more than once"
                )));
            }
            seen.push(prefix);
        }

        if self.sheet_name_limit == 0 || self.sheet_name_limit > MAX_SHEET_NAME_LEN {
            return Err(ToolError::InvalidConfig(format!(
                "sheet_name_limit must be between 1 and {MAX_SHEET_NAME_LEN}, got {}",
                self.sheet_name_limit
            )));
        }

        for field in self.aliases.fields() {
            if matches!(
                field,
                CanonicalField::Price | CanonicalField::SerialNumber | CanonicalField::SnomedCode
            ) {
                return Err(ToolError::InvalidConfig(format!(
                    "'{field}' is matched exactly and cannot take aliases"
                )));
            }
        }

        let extension = self.file_extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(ToolError::InvalidConfig("file_extension must not be empty".into()));
        }

        Ok(())
    }

    /// File extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.file_extension.trim_start_matches('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SplitterConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.tiers.len(), 5);
        assert_eq!(config.sheet_name_limit, 31);
        assert_eq!(config.archive_name, "RH_Tiers_Workbooks.zip");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SplitterConfig::from_json(
            r#"{ "tiers": ["Tier 1", "Tier 2"], "header_policy": "compact" }"#,
        )
        .expect("config parsed");
        assert_eq!(config.tiers, vec![Tier::new("Tier 1"), Tier::new("Tier 2")]);
        assert_eq!(config.header_policy, HeaderPolicy::Compact);
        assert_eq!(config.tier_match, TierMatch::Prefix);
        assert_eq!(config.aliases, AliasTable::default());
    }

    #[test]
    fn aliases_are_keyed_by_canonical_label() {
        let config = SplitterConfig::from_json(
            r#"{ "aliases": { "TARIFF NAME": ["SERVICE", "PROCEDURE"] } }"#,
        )
        .expect("config parsed");
        assert_eq!(
            config.aliases.variants(CanonicalField::TariffName),
            vec!["SERVICE", "PROCEDURE"]
        );
    }

    #[test]
    fn rejects_aliases_for_exact_fields() {
        let error = SplitterConfig::from_json(r#"{ "aliases": { "PRICE": ["COST"] } }"#)
            .expect_err("price aliases rejected");
        assert!(matches!(error, ToolError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_empty_and_duplicate_tiers() {
        assert!(SplitterConfig::from_json(r#"{ "tiers": [] }"#).is_err());
        assert!(SplitterConfig::from_json(r#"{ "tiers": ["  "] }"#).is_err());
        assert!(SplitterConfig::from_json(r#"{ "tiers": ["Tier 1", "tier 1 "] }"#).is_err());
    }

    #[test]
    fn rejects_out_of_range_sheet_name_limit() {
        assert!(SplitterConfig::from_json(r#"{ "sheet_name_limit": 0 }"#).is_err());
        assert!(SplitterConfig::from_json(r#"{ "sheet_name_limit": 40 }"#).is_err());
        assert!(SplitterConfig::from_json(r#"{ "sheet_name_limit": 10 }"#).is_ok());
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = SplitterConfig::from_json(r#"{ "tierz": ["Tier 1"] }"#)
            .expect_err("unknown key rejected");
        assert!(matches!(error, ToolError::Json(_)));
    }
}
