//! Report artifact writer - the downloadable proof of hours
//!
//! A finished [`Report`] is written as a one-sheet workbook (`.xlsx`), or
//! serialized as YAML/JSON. The output format follows the file extension.

use crate::error::{StrikeError, StrikeResult};
use crate::report::{HoursDisplay, Report};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use std::fs;
use std::path::Path;

const SHEET_NAME: &str = "Relatorio";
const TITLE: &str = "COMPROVANTE DE HORAS DE GREVE";
const HEADERS: [&str; 3] = ["Mês", "Dias", "Hrs"];

/// Output formats for a report artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Yaml,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> StrikeResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "json" => Ok(ExportFormat::Json),
            other => Err(StrikeError::Export(format!(
                "Unsupported output format '{}' (use .xlsx, .yaml or .json)",
                other
            ))),
        }
    }
}

/// Default download name for an employee's report
pub fn artifact_name(employee: &str) -> String {
    let safe: String = employee
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("Horas_{}.xlsx", safe)
}

pub struct ReportExporter<'a> {
    report: &'a Report,
}

impl<'a> ReportExporter<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Write the report to `path`, choosing the format from its extension
    pub fn export(&self, path: &Path) -> StrikeResult<()> {
        match ExportFormat::from_path(path)? {
            ExportFormat::Xlsx => {
                let mut workbook = self.build_workbook()?;
                workbook
                    .save(path)
                    .map_err(|e| StrikeError::Export(format!("Failed to save workbook: {}", e)))?;
            }
            ExportFormat::Yaml => fs::write(path, serde_yaml::to_string(self.report)?)?,
            ExportFormat::Json => fs::write(path, serde_json::to_string_pretty(self.report)?)?,
        }
        Ok(())
    }

    /// Workbook bytes, for serving as a download
    pub fn to_xlsx_bytes(&self) -> StrikeResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save_to_buffer()
            .map_err(|e| StrikeError::Export(format!("Failed to build workbook: {}", e)))
    }

    fn build_workbook(&self) -> StrikeResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(|e| StrikeError::Export(format!("Failed to set worksheet name: {}", e)))?;
        self.write_sheet(worksheet)
            .map_err(|e| StrikeError::Export(format!("Failed to write report: {}", e)))?;
        Ok(workbook)
    }

    fn write_sheet(&self, sheet: &mut Worksheet) -> Result<(), rust_xlsxwriter::XlsxError> {
        let report = self.report;
        let bold = Format::new().set_bold();
        let title = Format::new().set_bold().set_font_size(14);
        let header = Format::new()
            .set_bold()
            .set_font_color("#FFFFFF")
            .set_background_color("#0F572D")
            .set_align(FormatAlign::Center);
        let hours_format = Format::new().set_num_format("0.00");

        sheet.write_string_with_format(0, 0, TITLE, &title)?;
        sheet.write_string_with_format(
            1,
            0,
            format!("TOTAL: {} HORAS", report.total_display),
            &bold,
        )?;
        sheet.write_string(2, 0, format!("Servidor: {}", report.employee))?;

        for (col, name) in HEADERS.iter().enumerate() {
            sheet.write_string_with_format(4, col as u16, *name, &header)?;
        }

        let mut row = 5u32;
        for line in &report.rows {
            sheet.write_string(row, 0, &line.month)?;
            sheet.write_string(row, 1, &line.days)?;
            match report.display {
                HoursDisplay::Numeric => {
                    sheet.write_number_with_format(row, 2, line.hours, &hours_format)?;
                }
                HoursDisplay::Literal => {
                    sheet.write_string(row, 2, &line.hours_display)?;
                }
            }
            row += 1;
        }

        sheet.write_string_with_format(row, 0, "TOTAL", &bold)?;
        sheet.write_string_with_format(row, 2, &report.total_display, &bold)?;

        sheet.set_column_width(0, 14)?;
        sheet.set_column_width(1, 18)?;
        sheet.set_column_width(2, 12)?;
        Ok(())
    }
}
