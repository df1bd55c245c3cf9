use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::Result;
use crate::io::archive::ArchiveEntry;
use crate::model::{CellValue, TierWorkbook};

/// Writes a tier workbook to the given path.
pub fn write_tier_workbook(path: &Path, workbook: &TierWorkbook) -> Result<()> {
    let mut workbook_writer = build_workbook(workbook)?;
    workbook_writer.save(path)?;
    Ok(())
}

/// Serialises a tier workbook into `.xlsx` bytes.
pub fn tier_workbook_to_bytes(workbook: &TierWorkbook) -> Result<Vec<u8>> {
    let mut workbook_writer = build_workbook(workbook)?;
    Ok(workbook_writer.save_to_buffer()?)
}

/// Renders every tier workbook as a named blob, ready for packing.
pub fn render_tier_workbooks(
    workbooks: &[TierWorkbook],
    extension: &str,
) -> Result<Vec<ArchiveEntry>> {
    workbooks
        .iter()
        .map(|workbook| {
            Ok(ArchiveEntry {
                name: workbook.file_name(extension),
                bytes: tier_workbook_to_bytes(workbook)?,
            })
        })
        .collect()
}

fn build_workbook(workbook: &TierWorkbook) -> Result<Workbook> {
    let mut workbook_writer = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in &workbook.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.sheet_name)?;

        for (col_idx, header) in sheet.headers().into_iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, (row_idx + 1) as u32, col_idx as u16, cell)?;
            }
        }

        if !sheet.rows.is_empty() {
            let col_end = (sheet.columns.len() as u16).saturating_sub(1);
            worksheet.autofilter(0, 0, sheet.rows.len() as u32, col_end)?;
        }
    }

    Ok(workbook_writer)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Empty => {}
        CellValue::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        CellValue::Integer(value) => {
            worksheet.write_number(row, col, *value as f64)?;
        }
        CellValue::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        CellValue::Boolean(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
    }
    Ok(())
}
