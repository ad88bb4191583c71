//! Sheet normalizer - raw grid → month table
//!
//! Source sheets carry title rows, blank rows and notes above the real
//! header, so the header is found by scanning for the employee-name column
//! instead of assuming row 0.

use crate::types::{canonical_text, is_missing_text, CanonicalTable, CellValue, RawSheet, Record};
use std::collections::HashSet;
use tracing::debug;

/// Header tokens that mark the employee name column
pub const DEFAULT_NAME_TOKENS: &[&str] = &["NOME", "NAME"];

/// Detects the header row of a sheet and builds its records
#[derive(Debug, Clone)]
pub struct SheetNormalizer {
    name_tokens: Vec<String>,
}

impl Default for SheetNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_TOKENS)
    }
}

impl SheetNormalizer {
    pub fn new<S: AsRef<str>>(name_tokens: &[S]) -> Self {
        Self {
            name_tokens: name_tokens
                .iter()
                .map(|t| canonical_text(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// First row containing a name token, with the token that matched
    pub fn find_header_row(&self, sheet: &RawSheet) -> Option<(usize, String)> {
        sheet.rows.iter().enumerate().find_map(|(idx, row)| {
            let values: HashSet<String> = row.iter().map(CellValue::canonical).collect();
            self.name_tokens
                .iter()
                .find(|token| values.contains(*token))
                .map(|token| (idx, token.clone()))
        })
    }

    /// Normalize a sheet; `None` when it has no header row
    pub fn normalize(&self, sheet: &RawSheet, month_label: &str) -> Option<CanonicalTable> {
        let Some((header_idx, name_column)) = self.find_header_row(sheet) else {
            debug!(sheet = %sheet.name, "no header row, sheet skipped");
            return None;
        };

        let columns = header_columns(&sheet.rows[header_idx], sheet.width());
        let records: Vec<Record> = sheet.rows[header_idx + 1..]
            .iter()
            .map(|row| {
                let mut record = Record::new();
                for (col, column) in columns.iter().enumerate() {
                    let value = row.get(col).cloned().unwrap_or(CellValue::Empty);
                    record.insert(column.clone(), value);
                }
                record
            })
            .collect();

        debug!(
            sheet = %sheet.name,
            header_row = header_idx,
            columns = columns.len(),
            records = records.len(),
            "header detected"
        );

        Some(CanonicalTable {
            month_label: month_label.to_string(),
            sheet_name: sheet.name.clone(),
            columns,
            name_column,
            records,
        })
    }
}

/// Canonical column names for a header row.
///
/// Blank header cells become `COL_<index>`; a repeated name gets a
/// `_<index>` suffix (counting up from the column index while taken) so
/// every column keeps its own key.
pub fn header_columns(header: &[CellValue], width: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(width);

    for col in 0..width.max(header.len()) {
        let text = header.get(col).map(CellValue::canonical).unwrap_or_default();
        let mut name = if is_missing_text(&text) {
            format!("COL_{}", col)
        } else {
            text
        };
        let base = name.clone();
        let mut suffix = col;
        while seen.contains(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        columns.push(name);
    }

    columns
}
