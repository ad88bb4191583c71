use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Text forms that spreadsheets and exports use for "no value"
pub const MISSING_MARKERS: &[&str] = &["nan", "none", "null", "nat"];

static EMPTY_CELL: CellValue = CellValue::Empty;

//==============================================================================
// Cell values
//==============================================================================

/// A single scalar read from a sheet, before any interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Blank cell (the "empty / not-a-number" sentinel)
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Real date/time cell
    DateTime(NaiveDateTime),
    /// ISO 8601 duration as stored by the file (e.g. `PT7H30M0S`)
    Duration(String),
    /// Cell error such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// True for blank cells and for text that only carries a missing marker
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => is_missing_text(s),
            _ => false,
        }
    }

    /// Source text of the cell, as a user would read it in the sheet
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Duration(s) => s.clone(),
            CellValue::Error(e) => e.clone(),
        }
    }

    /// Comparison form: trimmed and uppercased
    pub fn canonical(&self) -> String {
        canonical_text(&self.to_text())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Trimmed, uppercased form used for every name and header comparison
pub fn canonical_text(s: &str) -> String {
    s.trim().to_uppercase()
}

/// True for blank text or one of the [`MISSING_MARKERS`]
pub fn is_missing_text(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || MISSING_MARKERS.iter().any(|m| t.eq_ignore_ascii_case(m))
}

/// Integers print without decimals, everything else as-is
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

//==============================================================================
// Raw sheets
//==============================================================================

/// Untyped grid of one sheet exactly as read from the file
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the grid
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

//==============================================================================
// Normalized tables
//==============================================================================

/// One data row keyed by canonical column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: HashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.fields.insert(column.into(), value);
    }

    /// Value of a column; unknown columns read as [`CellValue::Empty`]
    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&EMPTY_CELL)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }
}

/// Normalized table for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTable {
    /// Canonical short label (e.g. `NOV/2025`)
    pub month_label: String,
    /// Sheet name as found in the file
    pub sheet_name: String,
    /// Column names in sheet order
    pub columns: Vec<String>,
    /// Header token that identified the employee name column
    pub name_column: String,
    pub records: Vec<Record>,
}

impl CanonicalTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_name_column(&self) -> bool {
        self.columns.iter().any(|c| c == &self.name_column)
    }

    /// First column matching one of the aliases, ignoring case and whitespace
    pub fn find_column<S: AsRef<str>>(&self, aliases: &[S]) -> Option<&str> {
        aliases.iter().find_map(|alias| {
            let wanted = column_key(alias.as_ref());
            self.columns
                .iter()
                .find(|c| column_key(c) == wanted)
                .map(String::as_str)
        })
    }

    /// Canonical employee name of a record
    pub fn name_of(&self, record: &Record) -> String {
        record.get(&self.name_column).canonical()
    }
}

/// Column lookup key: uppercase with all whitespace removed
fn column_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// All normalized months of one load, in source sheet order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthData {
    pub tables: Vec<CanonicalTable>,
}

impl MonthData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a month; a table with an existing label replaces it in place
    pub fn insert(&mut self, table: CanonicalTable) {
        match self
            .tables
            .iter_mut()
            .find(|t| t.month_label == table.month_label)
        {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn get(&self, month_label: &str) -> Option<&CanonicalTable> {
        self.tables.iter().find(|t| t.month_label == month_label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.month_label.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.tables.iter().map(CanonicalTable::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(label: &str, names: &[&str]) -> CanonicalTable {
        CanonicalTable {
            month_label: label.to_string(),
            sheet_name: label.to_string(),
            columns: vec!["NOME".to_string(), "HORAS /GREVE".to_string()],
            name_column: "NOME".to_string(),
            records: names
                .iter()
                .map(|n| {
                    let mut r = Record::new();
                    r.insert("NOME", CellValue::from(*n));
                    r
                })
                .collect(),
        }
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::Number(8.0).to_text(), "8");
        assert_eq!(CellValue::Number(7.5).to_text(), "7.5");
        assert_eq!(CellValue::Bool(true).to_text(), "TRUE");
        let dt = NaiveDate::from_ymd_opt(2025, 11, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(dt).to_text(), "2025-11-05 00:00:00");
    }

    #[test]
    fn test_cell_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::from("  ").is_empty());
        assert!(CellValue::from("NaN").is_empty());
        assert!(!CellValue::from("Ana").is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_canonical() {
        assert_eq!(CellValue::from("  maria  silva ").canonical(), "MARIA  SILVA");
    }

    #[test]
    fn test_raw_sheet_get_out_of_bounds() {
        let sheet = RawSheet::new("S", vec![vec![CellValue::from("a")], vec![]]);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.width(), 1);
        assert_eq!(sheet.get(0, 0), &CellValue::from("a"));
        assert_eq!(sheet.get(1, 0), &CellValue::Empty);
        assert_eq!(sheet.get(9, 9), &CellValue::Empty);
    }

    #[test]
    fn test_find_column_ignores_spacing() {
        let t = table("NOV/2025", &[]);
        assert_eq!(t.find_column(&["horas/greve"]), Some("HORAS /GREVE"));
        assert_eq!(t.find_column(&["DATA"]), None);
        assert!(t.has_name_column());
    }

    #[test]
    fn test_month_data_insert_replaces_in_place() {
        let mut data = MonthData::new();
        data.insert(table("NOV/2025", &["a"]));
        data.insert(table("DEZ/2025", &["b"]));
        data.insert(table("NOV/2025", &["c", "d"]));

        assert_eq!(data.labels(), vec!["NOV/2025", "DEZ/2025"]);
        assert_eq!(data.get("NOV/2025").unwrap().len(), 2);
        assert_eq!(data.total_records(), 3);
    }
}
