//! Tier workbook assembly and the per-tier split.

pub mod naming;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{CollisionPolicy, SplitterConfig};
use crate::model::{ProjectedSheet, RawSheet, TierWorkbook};
use crate::project::SheetProjector;
use crate::schema::tier::Tier;

use self::naming::{SheetNameRegistry, sheet_name_key, truncate_sheet_name};

/// Collects every sheet's projection for one tier into a workbook.
#[derive(Debug, Clone)]
pub struct TierWorkbookAssembler {
    projector: SheetProjector,
    sheet_name_limit: usize,
    collisions: CollisionPolicy,
}

impl TierWorkbookAssembler {
    pub fn new(config: &SplitterConfig) -> Self {
        Self {
            projector: SheetProjector::new(config),
            sheet_name_limit: config.sheet_name_limit,
            collisions: config.sheet_name_collisions,
        }
    }

    /// Projects `sheets` in order for `tier`.
    ///
    /// Returns `None` when no sheet has a column for the tier. Output sheet
    /// names are truncated to the configured limit and compared ignoring case;
    /// with [`CollisionPolicy::LastWriteWins`] a later sheet whose truncated
    /// name is already taken replaces the earlier sheet at its original
    /// position. [`CollisionPolicy::Suffix`] falls back to the same
    /// replacement once no suffix fits within the limit.
    pub fn assemble(&self, sheets: &[RawSheet], tier: &Tier) -> Option<TierWorkbook> {
        let mut registry = SheetNameRegistry::new(self.sheet_name_limit);
        let mut output: Vec<ProjectedSheet> = Vec::new();

        for sheet in sheets {
            let Some(mut projected) = self.projector.project(sheet, tier) else {
                continue;
            };

            let truncated = truncate_sheet_name(&sheet.name, self.sheet_name_limit);
            let assigned = match self.collisions {
                CollisionPolicy::LastWriteWins => None,
                CollisionPolicy::Suffix => registry.assign(&sheet.name),
            };

            match assigned {
                Some(name) => {
                    if name != truncated {
                        warn!(
                            %tier,
                            sheet = %sheet.name,
                            output_sheet = %name,
                            "truncated sheet name collides, renamed"
                        );
                    }
                    projected.sheet_name = name;
                    output.push(projected);
                }
                None => {
                    projected.sheet_name = truncated;
                    replace_or_push(&mut output, projected, tier, &sheet.name);
                }
            }
        }

        if output.is_empty() {
            debug!(%tier, "no sheet carries this tier");
            return None;
        }

        debug!(%tier, sheet_count = output.len(), "tier workbook assembled");
        Some(TierWorkbook {
            tier: tier.clone(),
            sheets: output,
        })
    }
}

/// Adds `projected`, replacing an earlier sheet whose name Excel would treat as
/// the same (case-insensitive) at that sheet's position.
fn replace_or_push(
    output: &mut Vec<ProjectedSheet>,
    projected: ProjectedSheet,
    tier: &Tier,
    source: &str,
) {
    let key = sheet_name_key(&projected.sheet_name);
    match output
        .iter_mut()
        .find(|existing| sheet_name_key(&existing.sheet_name) == key)
    {
        Some(existing) => {
            warn!(
                %tier,
                sheet = %source,
                output_sheet = %projected.sheet_name,
                "truncated sheet name collides, replacing earlier sheet"
            );
            *existing = projected;
        }
        None => output.push(projected),
    }
}

/// Splits a workbook into one workbook per configured tier.
#[derive(Debug, Clone)]
pub struct WorkbookSplitter {
    assembler: TierWorkbookAssembler,
    tiers: Vec<Tier>,
}

impl WorkbookSplitter {
    pub fn new(config: &SplitterConfig) -> Self {
        Self {
            assembler: TierWorkbookAssembler::new(config),
            tiers: config.tiers.clone(),
        }
    }

    /// Splits `sheets` over the configured tiers.
    pub fn split(&self, sheets: &[RawSheet]) -> Vec<TierWorkbook> {
        self.split_tiers(sheets, &self.tiers)
    }

    /// Splits `sheets` over `tiers`, keeping only tiers that produced a
    /// workbook. Tiers are assembled in parallel; the result follows the order
    /// of `tiers`.
    pub fn split_tiers(&self, sheets: &[RawSheet], tiers: &[Tier]) -> Vec<TierWorkbook> {
        let assembled: Vec<Option<TierWorkbook>> = tiers
            .par_iter()
            .map(|tier| self.assembler.assemble(sheets, tier))
            .collect();

        let workbooks: Vec<TierWorkbook> = assembled.into_iter().flatten().collect();
        info!(
            sheet_count = sheets.len(),
            tier_count = tiers.len(),
            workbook_count = workbooks.len(),
            "split complete"
        );
        workbooks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn sheet(name: &str, headers: &[&str], rows: &[&[&str]]) -> RawSheet {
        RawSheet::new(
            name,
            headers.iter().map(|header| header.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|value| CellValue::from(*value)).collect())
                .collect(),
        )
    }

    fn tier_labels(workbooks: &[TierWorkbook]) -> Vec<&str> {
        workbooks.iter().map(|workbook| workbook.tier.label()).collect()
    }

    #[test]
    fn assembles_only_sheets_carrying_the_tier() {
        let sheets = vec![
            sheet("Lab", &["S/N", "Tier 3"], &[&["1", "10"]]),
            sheet("Pharmacy", &["S/N", "Tier 1"], &[&["1", "20"]]),
        ];
        let assembler = TierWorkbookAssembler::new(&SplitterConfig::default());

        let workbook = assembler
            .assemble(&sheets, &Tier::new("Tier 3"))
            .expect("Tier 3 workbook");

        assert_eq!(workbook.sheets.len(), 1);
        assert_eq!(workbook.sheets[0].sheet_name, "Lab");
    }

    #[test]
    fn tier_without_any_column_yields_no_workbook() {
        let sheets = vec![sheet("Lab", &["S/N", "Tier 1"], &[&["1", "10"]])];
        let assembler = TierWorkbookAssembler::new(&SplitterConfig::default());
        assert!(assembler.assemble(&sheets, &Tier::new("Tier 0")).is_none());
        assert!(assembler.assemble(&[], &Tier::new("Tier 1")).is_none());
    }

    #[test]
    fn sheet_order_follows_source_order() {
        let sheets = vec![
            sheet("Radiology", &["Tier 2"], &[&["1"]]),
            sheet("Admin", &["Tier 1"], &[&["2"]]),
            sheet("Lab", &["Tier 2"], &[&["3"]]),
        ];
        let assembler = TierWorkbookAssembler::new(&SplitterConfig::default());

        let workbook = assembler.assemble(&sheets, &Tier::new("Tier 2")).unwrap();

        let names: Vec<&str> = workbook
            .sheets
            .iter()
            .map(|sheet| sheet.sheet_name.as_str())
            .collect();
        assert_eq!(names, vec!["Radiology", "Lab"]);
    }

    #[test]
    fn truncation_collision_keeps_last_sheet_in_first_position() {
        let sheets = vec![
            sheet("Consultations and Procedures - Outpatient", &["Tier 1"], &[&["10"]]),
            sheet("Lab", &["Tier 1"], &[&["20"]]),
            sheet("Consultations and Procedures - Inpatient", &["Tier 1"], &[&["30"]]),
        ];
        let assembler = TierWorkbookAssembler::new(&SplitterConfig::default());

        let workbook = assembler.assemble(&sheets, &Tier::new("Tier 1")).unwrap();

        assert_eq!(workbook.sheets.len(), 2);
        assert_eq!(workbook.sheets[0].sheet_name, "Consultations and Procedures - ");
        assert_eq!(workbook.sheets[0].rows, vec![vec![CellValue::from("30")]]);
        assert_eq!(workbook.sheets[1].sheet_name, "Lab");
    }

    #[test]
    fn suffix_policy_keeps_both_colliding_sheets() {
        let config = SplitterConfig {
            sheet_name_collisions: CollisionPolicy::Suffix,
            ..SplitterConfig::default()
        };
        let sheets = vec![
            sheet("Consultations and Procedures - Outpatient", &["Tier 1"], &[&["10"]]),
            sheet("Consultations and Procedures - Inpatient", &["Tier 1"], &[&["30"]]),
        ];
        let assembler = TierWorkbookAssembler::new(&config);

        let workbook = assembler.assemble(&sheets, &Tier::new("Tier 1")).unwrap();

        let names: Vec<&str> = workbook
            .sheets
            .iter()
            .map(|sheet| sheet.sheet_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Consultations and Procedures - ", "Consultations and Procedures _1"]
        );
    }

    #[test]
    fn names_differing_only_in_case_collide() {
        let sheets = vec![
            sheet("CONSULTATIONS AND PROCEDURES - Outpatient", &["Tier 1"], &[&["10"]]),
            sheet("Consultations and Procedures - Inpatient", &["Tier 1"], &[&["30"]]),
        ];

        let workbook = TierWorkbookAssembler::new(&SplitterConfig::default())
            .assemble(&sheets, &Tier::new("Tier 1"))
            .unwrap();
        assert_eq!(workbook.sheets.len(), 1);
        assert_eq!(workbook.sheets[0].sheet_name, "Consultations and Procedures - ");
        assert_eq!(workbook.sheets[0].rows, vec![vec![CellValue::from("30")]]);

        let config = SplitterConfig {
            sheet_name_collisions: CollisionPolicy::Suffix,
            ..SplitterConfig::default()
        };
        let workbook = TierWorkbookAssembler::new(&config)
            .assemble(&sheets, &Tier::new("Tier 1"))
            .unwrap();
        let names: Vec<&str> = workbook
            .sheets
            .iter()
            .map(|sheet| sheet.sheet_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["CONSULTATIONS AND PROCEDURES - ", "Consultations and Procedures _1"]
        );
    }

    #[test]
    fn suffix_policy_stays_within_tiny_limit() {
        let config = SplitterConfig {
            sheet_name_limit: 1,
            sheet_name_collisions: CollisionPolicy::Suffix,
            ..SplitterConfig::default()
        };
        let sheets = vec![
            sheet("Lab", &["Tier 1"], &[&["10"]]),
            sheet("Labour Ward", &["Tier 1"], &[&["20"]]),
            sheet("Pharmacy", &["Tier 1"], &[&["30"]]),
        ];

        let workbook = TierWorkbookAssembler::new(&config)
            .assemble(&sheets, &Tier::new("Tier 1"))
            .unwrap();

        let names: Vec<&str> = workbook
            .sheets
            .iter()
            .map(|sheet| sheet.sheet_name.as_str())
            .collect();
        assert_eq!(names, vec!["L", "P"]);
        assert_eq!(workbook.sheets[0].rows, vec![vec![CellValue::from("20")]]);
    }

    #[test]
    fn shorter_sheet_name_limit_is_honoured() {
        let config = SplitterConfig {
            sheet_name_limit: 5,
            ..SplitterConfig::default()
        };
        let sheets = vec![sheet("Pharmacy", &["Tier 1"], &[&["10"]])];
        let assembler = TierWorkbookAssembler::new(&config);

        let workbook = assembler.assemble(&sheets, &Tier::new("Tier 1")).unwrap();

        assert_eq!(workbook.sheets[0].sheet_name, "Pharm");
    }

    #[test]
    fn split_omits_tiers_without_columns_and_keeps_tier_order() {
        let sheets = vec![
            sheet("Lab", &["S/N", "Tier 1", "Tier 3"], &[&["1", "10", "30"]]),
            sheet("Ward", &["S/N", "Tier 4", "Tier 2"], &[&["1", "40", "20"]]),
        ];
        let splitter = WorkbookSplitter::new(&SplitterConfig::default());

        let workbooks = splitter.split(&sheets);

        assert_eq!(tier_labels(&workbooks), vec!["Tier 1", "Tier 2", "Tier 3", "Tier 4"]);
        assert!(workbooks.iter().all(|workbook| !workbook.sheets.is_empty()));
    }

    #[test]
    fn split_follows_requested_tier_order() {
        let sheets = vec![sheet("Lab", &["Tier 1", "Tier 2"], &[&["10", "20"]])];
        let splitter = WorkbookSplitter::new(&SplitterConfig::default());

        let workbooks =
            splitter.split_tiers(&sheets, &[Tier::new("Tier 2"), Tier::new("Tier 1")]);

        assert_eq!(tier_labels(&workbooks), vec!["Tier 2", "Tier 1"]);
    }

    #[test]
    fn split_of_sheets_without_tiers_is_empty() {
        let sheets = vec![sheet("Notes", &["Comment"], &[&["n/a"]])];
        let splitter = WorkbookSplitter::new(&SplitterConfig::default());
        assert!(splitter.split(&sheets).is_empty());
    }
}
