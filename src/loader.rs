//! Spreadsheet loader - workbook file → [`MonthData`]
//!
//! Every sheet is read with calamine, normalized, and relabelled to its
//! canonical month label. Sheets without a header row are skipped.

use crate::config::{Config, SheetLabels};
use crate::error::{StrikeError, StrikeResult};
use crate::parsers::excel_epoch;
use crate::sheet::SheetNormalizer;
use crate::types::{CellValue, MonthData, RawSheet};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Reads a multi-sheet workbook into normalized month tables
#[derive(Debug, Clone)]
pub struct SpreadsheetLoader {
    path: PathBuf,
    labels: SheetLabels,
    normalizer: SheetNormalizer,
}

impl SpreadsheetLoader {
    /// Create a loader with the built-in labels and name tokens
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            labels: SheetLabels::default(),
            normalizer: SheetNormalizer::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            path: config.source.clone(),
            labels: config.labels.clone(),
            normalizer: SheetNormalizer::new(config.columns.name.as_slice()),
        }
    }

    pub fn with_labels(mut self, labels: SheetLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every sheet of the workbook as a raw grid
    pub fn read_sheets(&self) -> StrikeResult<Vec<RawSheet>> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            StrikeError::Spreadsheet(format!(
                "Failed to open {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(sheet_names.len());

        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                StrikeError::Spreadsheet(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            sheets.push(raw_sheet_from_range(&sheet_name, &range));
        }

        Ok(sheets)
    }

    /// Load and normalize the workbook
    pub fn load(&self) -> StrikeResult<MonthData> {
        let sheets = self.read_sheets()?;
        let sheet_count = sheets.len();
        let data = self.from_sheets(sheets);

        info!(
            source = %self.path.display(),
            sheets = sheet_count,
            months = data.len(),
            records = data.total_records(),
            "workbook loaded"
        );
        Ok(data)
    }

    /// Load, absorbing any failure as "no data"
    pub fn load_or_none(&self) -> Option<MonthData> {
        match self.load() {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(source = %self.path.display(), error = %e, "workbook not loaded");
                None
            }
        }
    }

    /// Normalize already-read sheets, in order
    pub fn from_sheets<I>(&self, sheets: I) -> MonthData
    where
        I: IntoIterator<Item = RawSheet>,
    {
        let mut data = MonthData::new();
        for sheet in sheets {
            let label = self.labels.label_for(&sheet.name);
            match self.normalizer.normalize(&sheet, &label) {
                Some(table) => {
                    debug!(sheet = %sheet.name, label = %label, "month table added");
                    data.insert(table);
                }
                None => debug!(sheet = %sheet.name, "not a data sheet"),
            }
        }
        data
    }
}

/// Copy a calamine range into a grid anchored at cell A1
pub fn raw_sheet_from_range(name: &str, range: &Range<Data>) -> RawSheet {
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(CellValue::from));
        rows.push(cells);
    }

    RawSheet::new(name, rows)
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                serial_to_datetime(serial)
                    .map(CellValue::DateTime)
                    .unwrap_or(CellValue::Number(serial))
            }
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Duration(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

/// Serial day number (1900 date system) → date/time
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial * 86_400_000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    excel_epoch().checked_add_signed(Duration::milliseconds(millis as i64))
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
