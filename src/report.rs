//! Report aggregator - one employee's strike days and hours across months
//!
//! Months are visited in load order; every record whose canonical name
//! equals the selected employee becomes one [`ReportRow`]. The total is
//! always summed from parsed hours, never from display text.

use crate::config::{ColumnAliases, Config};
use crate::parsers::{
    format_minutes, literal_hours_text, minutes_from_hours, parse_days, try_parse_hours, DaysSource,
};
use crate::types::{canonical_text, CellValue, MonthData};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How hour values and the total are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HoursDisplay {
    /// Parsed decimal hours with two decimals; total as `18.50`
    #[default]
    Numeric,
    /// Hours cell text as written in the sheet; total as `18h30min`
    Literal,
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub month: String,
    pub days: String,
    pub hours_display: String,
    pub hours: f64,
}

/// A value the report had to guess at or drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    /// Hours cell could not be read and counted as zero
    UnparseableHours {
        month: String,
        raw: String,
        reason: String,
    },
    /// Days text was read as a calendar date and shown as its day
    TextDate {
        month: String,
        raw: String,
        days: String,
    },
    /// The month has no column for hours or dates
    MissingColumn { month: String, column: String },
}

/// Finished report for one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub employee: String,
    pub display: HoursDisplay,
    pub rows: Vec<ReportRow>,
    pub total_hours: f64,
    pub total_display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DataIssue>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds [`Report`]s from loaded month data
#[derive(Debug, Clone, Default)]
pub struct ReportAggregator {
    columns: ColumnAliases,
    display: HoursDisplay,
}

impl ReportAggregator {
    pub fn new(display: HoursDisplay) -> Self {
        Self {
            columns: ColumnAliases::default(),
            display,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            columns: config.columns.clone(),
            display: config.display,
        }
    }

    pub fn with_display(mut self, display: HoursDisplay) -> Self {
        self.display = display;
        self
    }

    pub fn display(&self) -> HoursDisplay {
        self.display
    }

    /// Aggregate every record of `employee` (a canonical name from search)
    pub fn aggregate(&self, data: &MonthData, employee: &str) -> Report {
        let target = canonical_text(employee);
        let mut rows = Vec::new();
        let mut issues = Vec::new();
        let mut total_hours = 0.0;
        let mut total_minutes: i64 = 0;
        let empty = CellValue::Empty;

        for table in data.iter().filter(|t| t.has_name_column()) {
            let matches: Vec<_> = table
                .records
                .iter()
                .filter(|r| !target.is_empty() && table.name_of(r) == target)
                .collect();
            if matches.is_empty() {
                continue;
            }

            let month = table.month_label.clone();
            let hours_column = table.find_column(self.columns.hours.as_slice());
            let date_column = table.find_column(self.columns.date.as_slice());
            if hours_column.is_none() {
                issues.push(DataIssue::MissingColumn {
                    month: month.clone(),
                    column: "hours".to_string(),
                });
            }
            if date_column.is_none() {
                issues.push(DataIssue::MissingColumn {
                    month: month.clone(),
                    column: "date".to_string(),
                });
            }

            for record in matches {
                let hours_cell = hours_column.map_or(&empty, |c| record.get(c));
                let date_cell = date_column.map_or(&empty, |c| record.get(c));

                let hours = match try_parse_hours(hours_cell) {
                    Ok(h) => h,
                    Err(e) => {
                        issues.push(DataIssue::UnparseableHours {
                            month: month.clone(),
                            raw: hours_cell.to_text(),
                            reason: e.to_string(),
                        });
                        0.0
                    }
                };

                let days = parse_days(date_cell);
                match days.source {
                    DaysSource::TextDate => issues.push(DataIssue::TextDate {
                        month: month.clone(),
                        raw: date_cell.to_text(),
                        days: days.text.clone(),
                    }),
                    DaysSource::Corrected => {
                        debug!(month = %month, raw = %date_cell, "corrupted date cell corrected")
                    }
                    DaysSource::DateCell | DaysSource::FreeText => {}
                }

                total_hours += hours;
                total_minutes = total_minutes.saturating_add(minutes_from_hours(hours));

                let hours_display = match self.display {
                    HoursDisplay::Numeric => format!("{:.2}", hours),
                    HoursDisplay::Literal => literal_hours_text(hours_cell),
                };

                rows.push(ReportRow {
                    month: month.clone(),
                    days: days.text,
                    hours_display,
                    hours,
                });
            }
        }

        for issue in &issues {
            warn!(employee = %target, issue = ?issue, "report data issue");
        }

        let (total_hours, total_display) = match self.display {
            HoursDisplay::Numeric => (total_hours, format!("{:.2}", total_hours)),
            HoursDisplay::Literal => (
                total_minutes as f64 / 60.0,
                format_minutes(total_minutes),
            ),
        };

        Report {
            employee: target,
            display: self.display,
            rows,
            total_hours,
            total_display,
            issues,
        }
    }
}

/// Aggregate with the default column aliases
pub fn build_report(data: &MonthData, employee: &str, display: HoursDisplay) -> Report {
    ReportAggregator::new(display).aggregate(data, employee)
}
