use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::SplitterConfig;
use crate::error::{Result, ToolError};
use crate::io::{archive, excel_read, excel_write};
use crate::model::TierWorkbook;
use crate::project::SheetProjector;
use crate::split::WorkbookSplitter;

/// Which tiers produced a workbook, and what went into each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitReport {
    pub sheets_read: usize,
    pub tiers: Vec<TierReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierReport {
    pub tier: String,
    pub file_name: String,
    pub sheets: Vec<String>,
    pub rows: usize,
}

impl SplitReport {
    fn new(sheets_read: usize, workbooks: &[TierWorkbook], extension: &str) -> Self {
        let tiers = workbooks
            .iter()
            .map(|workbook| TierReport {
                tier: workbook.tier.label().to_string(),
                file_name: workbook.file_name(extension),
                sheets: workbook
                    .sheets
                    .iter()
                    .map(|sheet| sheet.sheet_name.clone())
                    .collect(),
                rows: workbook.row_count(),
            })
            .collect();
        Self { sheets_read, tiers }
    }
}

/// Splits a price list workbook into one workbook per tier, packed as a zip.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn split_to_archive(input: &Path, output: &Path, config: &SplitterConfig) -> Result<SplitReport> {
    let (report, entries) = split_file(input, config)?;
    archive::write_archive(output, &entries)?;
    info!(entry_count = entries.len(), "archive written");
    Ok(report)
}

/// Splits a price list workbook and writes each tier workbook into `out_dir`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), out_dir = %out_dir.display())
)]
pub fn split_to_directory(
    input: &Path,
    out_dir: &Path,
    config: &SplitterConfig,
) -> Result<SplitReport> {
    let (report, entries) = split_file(input, config)?;
    archive::write_directory(out_dir, &entries)?;
    info!(file_count = entries.len(), "tier workbooks written");
    Ok(report)
}

fn split_file(
    input: &Path,
    config: &SplitterConfig,
) -> Result<(SplitReport, Vec<archive::ArchiveEntry>)> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }

    let sheets = excel_read::read_sheets(input)?;
    info!(sheet_count = sheets.len(), "read sheets from workbook");

    let workbooks = WorkbookSplitter::new(config).split(&sheets);
    if workbooks.is_empty() {
        warn!("no sheet carries any configured tier column");
    }

    let entries = excel_write::render_tier_workbooks(&workbooks, config.extension())?;
    Ok((
        SplitReport::new(sheets.len(), &workbooks, config.extension()),
        entries,
    ))
}

/// Resolution decisions for one sheet across all tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetInspection {
    pub sheet: String,
    pub headers: Vec<String>,
    pub tiers: Vec<TierInspection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierInspection {
    pub tier: String,
    /// `None` when the sheet does not contribute to the tier.
    pub columns: Option<Vec<InspectedColumn>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectedColumn {
    pub field: String,
    pub source_column: usize,
    pub source_header: String,
}

/// Reports which source column each tier and canonical field resolves to,
/// without writing anything.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn inspect(input: &Path, config: &SplitterConfig) -> Result<Vec<SheetInspection>> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }

    let sheets = excel_read::read_sheets(input)?;
    let projector = SheetProjector::new(config);

    let inspections = sheets
        .iter()
        .map(|sheet| SheetInspection {
            sheet: sheet.name.clone(),
            headers: sheet.headers.clone(),
            tiers: config
                .tiers
                .iter()
                .map(|tier| TierInspection {
                    tier: tier.label().to_string(),
                    columns: projector.plan(&sheet.headers, tier).map(|plan| {
                        plan.columns
                            .into_iter()
                            .map(|column| InspectedColumn {
                                field: column.field.label().to_string(),
                                source_column: column.index,
                                source_header: column.source_header,
                            })
                            .collect()
                    }),
                })
                .collect(),
        })
        .collect();

    Ok(inspections)
}
