use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::{CellValue, RawSheet};

/// Reads every sheet of an `.xlsx` workbook, in workbook order.
///
/// The first row of each sheet's used range is taken as the header row. Data
/// rows in which every cell is blank are dropped.
pub fn read_sheets(path: &Path) -> Result<Vec<RawSheet>> {
    let workbook: Xlsx<_> = open_workbook(path)?;
    read_all_sheets(workbook)
}

/// Same as [`read_sheets`], for a workbook already held in memory.
pub fn read_sheets_from_bytes(bytes: &[u8]) -> Result<Vec<RawSheet>> {
    let workbook = Xlsx::new(Cursor::new(bytes))?;
    read_all_sheets(workbook)
}

fn read_all_sheets<R: Read + Seek>(mut workbook: Xlsx<R>) -> Result<Vec<RawSheet>> {
    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());

    for name in &names {
        let range = read_required_sheet(&mut workbook, name)?;
        let sheet = sheet_from_range(name, &range);
        debug!(
            sheet = %sheet.name,
            column_count = sheet.headers.len(),
            row_count = sheet.rows.len(),
            "sheet read"
        );
        sheets.push(sheet);
    }

    Ok(sheets)
}

fn read_required_sheet<R: Read + Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("sheet '{name}' is not a worksheet")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn sheet_from_range(name: &str, range: &calamine::Range<DataType>) -> RawSheet {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };

    let data = rows
        .map(|row| row.iter().map(cell_to_value).collect::<Vec<_>>())
        .filter(|cells| !cells.iter().all(CellValue::is_blank))
        .collect();

    RawSheet::new(name, headers, data)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn cell_to_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Integer(*value),
        DataType::Bool(value) => CellValue::Boolean(*value),
        other => CellValue::Text(other.to_string()),
    }
}
