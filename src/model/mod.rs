use crate::schema::CanonicalField;
use crate::schema::tier::Tier;

/// Represents a scalar cell value read from or written to a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank cell.
    Empty,
    /// Plain string value.
    Text(String),
    /// Whole number stored as an integer by the source workbook.
    Integer(i64),
    /// Floating point number.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

impl CellValue {
    /// Converts the value into its text form, leaving blank cells blank.
    ///
    /// Numbers render in plain positional notation, so a numeric code such as
    /// `12345678901234.0` becomes `"12345678901234"` rather than an exponent form.
    pub fn to_text(&self) -> CellValue {
        match self {
            CellValue::Empty => CellValue::Empty,
            CellValue::Text(value) => CellValue::Text(value.clone()),
            CellValue::Integer(value) => CellValue::Text(value.to_string()),
            // `f64`'s Display never switches to scientific notation and omits
            // the fractional part of whole numbers.
            CellValue::Number(value) => CellValue::Text(value.to_string()),
            CellValue::Boolean(value) => CellValue::Text(value.to_string()),
        }
    }

    /// Returns `true` when the cell is blank or holds only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// A sheet as authored in the source workbook.
///
/// Rows are positionally aligned with `headers`; a row shorter than the header
/// row is padded with blanks on lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Creates a new sheet from its name, header labels, and data rows.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Returns the cell at the given row and column, or a blank cell when the
    /// row is too short.
    pub fn cell(&self, row: usize, column: usize) -> CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .cloned()
            .unwrap_or(CellValue::Empty)
    }
}

/// The canonical rows one sheet contributes to one tier workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSheet {
    pub sheet_name: String,
    /// Canonical columns present in this projection, in schema order.
    pub columns: Vec<CanonicalField>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ProjectedSheet {
    /// Header labels written as the first row of the output sheet.
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|field| field.label()).collect()
    }
}

/// All sheets produced for a single tier. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TierWorkbook {
    pub tier: Tier,
    pub sheets: Vec<ProjectedSheet>,
}

impl TierWorkbook {
    /// Suggested file name, e.g. `Tier 2_Price_List.xlsx`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_Price_List.{extension}", self.tier.label())
    }

    /// Looks up an output sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&ProjectedSheet> {
        self.sheets.iter().find(|sheet| sheet.sheet_name == name)
    }

    /// Total number of data rows across all sheets.
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.rows.len()).sum()
    }
}
