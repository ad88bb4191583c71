//! Cell value parsers
//!
//! Two independent parsers turn loosely typed cells into report values:
//! - Hours: duration strings (`42h48min`, `3h`, `7:30`, `PT7H30M`) and
//!   decimal hours (`7,5`, `7.50`, `8`) into a non-negative `f64`
//! - Days: date cells and free-text day lists into a display string
//!
//! Neither parser fails the caller. [`parse_hours`] degrades to `0.0` and
//! [`parse_days`] degrades to cleaned text; [`try_parse_hours`] and
//! [`DaysValue::source`] keep the information needed to audit those cases.

use crate::types::{is_missing_text, CellValue};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Year produced by the source file's broken serialization of one multi-day cell
pub const CORRUPTED_YEAR: i32 = 2010;

/// Day list that the corrupted cell actually holds
pub const CORRECTED_DAYS: &str = "05, 06, 10";

static HOURS_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*h").expect("Invalid regex pattern"));
static MINUTES_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*m").expect("Invalid regex pattern"));
static CLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2}))?$").expect("Invalid regex pattern")
});
static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:[ T]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$")
        .expect("Invalid regex pattern")
});
static NUMBER_TRIPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[\s,./-]+(\d{1,2})[\s,./-]+(\d{4}|\d{2})$")
        .expect("Invalid regex pattern")
});
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));
static COMMA_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*").expect("Invalid regex pattern"));

//==============================================================================
// Hours
//==============================================================================

/// Why an hours cell could not be read
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HoursParseError {
    #[error("not a number or duration: '{0}'")]
    Unparseable(String),

    #[error("negative hours: '{0}'")]
    Negative(String),

    #[error("calendar date in hours cell: '{0}'")]
    CalendarDate(String),

    #[error("unsupported cell: '{0}'")]
    Unsupported(String),
}

/// Parse an hours cell, reporting anything that would silently become zero.
///
/// Empty cells and missing markers are `Ok(0.0)`: they are absent values,
/// not bad ones.
pub fn try_parse_hours(value: &CellValue) -> Result<f64, HoursParseError> {
    match value {
        CellValue::Empty => Ok(0.0),
        CellValue::Number(n) => non_negative(*n, &value.to_text()),
        CellValue::Text(s) | CellValue::Duration(s) => parse_hours_text(s),
        CellValue::DateTime(dt) => hours_from_time_cell(dt),
        CellValue::Bool(_) | CellValue::Error(_) => {
            Err(HoursParseError::Unsupported(value.to_text()))
        }
    }
}

/// Lenient hours parser: any failure reads as `0.0`
pub fn parse_hours(value: &CellValue) -> f64 {
    try_parse_hours(value).unwrap_or(0.0)
}

/// Parse hours from free text (see module docs for accepted forms)
pub fn parse_hours_text(raw: &str) -> Result<f64, HoursParseError> {
    let s = raw.trim().to_lowercase();
    if is_missing_text(&s) {
        return Ok(0.0);
    }

    if let Some(hours) = parse_duration(&s) {
        return Ok(hours);
    }

    let decimal = s.replace(',', ".");
    let mut cleaned = String::with_capacity(decimal.len());
    for c in decimal.chars() {
        if c.is_ascii_digit() || c == '.' || (c == '-' && cleaned.is_empty()) {
            cleaned.push(c);
        }
    }

    match cleaned.parse::<f64>() {
        Ok(n) => non_negative(n, raw),
        _ => Err(HoursParseError::Unparseable(raw.to_string())),
    }
}

/// Duration encodings: `<H>h<M>min`, `<H>h`, `<M>min`, `H:MM[:SS]`, ISO `PT..H..M`
fn parse_duration(s: &str) -> Option<f64> {
    if let Some(caps) = CLOCK.captures(s) {
        let h: f64 = caps[1].parse().ok()?;
        let m: f64 = caps[2].parse().ok()?;
        let sec: f64 = caps.get(3).map_or(Ok(0.0), |c| c.as_str().parse()).ok()?;
        return Some(h + m / 60.0 + sec / 3600.0);
    }

    let hours = HOURS_MARKER.captures(s);
    let minutes = MINUTES_MARKER.captures(s);
    if hours.is_none() && minutes.is_none() {
        return None;
    }

    let h: f64 = match hours {
        Some(c) => c[1].replace(',', ".").parse().ok()?,
        None => 0.0,
    };
    let m: f64 = match minutes {
        Some(c) => c[1].parse().ok()?,
        None => 0.0,
    };
    Some(h + m / 60.0)
}

/// Time-of-day and `[h]:mm` cells are stored as serials on the 1899-12-30 epoch
fn hours_from_time_cell(dt: &NaiveDateTime) -> Result<f64, HoursParseError> {
    let epoch = excel_epoch();
    let limit = NaiveDate::from_ymd_opt(1900, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(epoch);

    if *dt < epoch || *dt >= limit {
        return Err(HoursParseError::CalendarDate(dt.to_string()));
    }
    Ok((*dt - epoch).num_seconds() as f64 / 3600.0)
}

fn non_negative(n: f64, raw: &str) -> Result<f64, HoursParseError> {
    if !n.is_finite() {
        Err(HoursParseError::Unparseable(raw.to_string()))
    } else if n < 0.0 {
        Err(HoursParseError::Negative(raw.to_string()))
    } else {
        Ok(n)
    }
}

/// Day zero of the spreadsheet 1900 date system
pub fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Whole minutes in a number of hours, rounded
pub fn minutes_from_hours(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Render minutes as `<H>h<MM>min`, or `<H>h` on the hour
pub fn format_minutes(total_minutes: i64) -> String {
    let total = total_minutes.max(0);
    let (h, m) = (total / 60, total % 60);
    if m > 0 {
        format!("{}h{:02}min", h, m)
    } else {
        format!("{}h", h)
    }
}

/// Hours cell as the sheet shows it.
///
/// Time-of-day and duration cells render as `H:MM`; everything else,
/// including date cells that are not times, keeps its source text.
pub fn literal_hours_text(value: &CellValue) -> String {
    match value {
        CellValue::DateTime(_) | CellValue::Duration(_) => match try_parse_hours(value) {
            Ok(hours) => {
                let minutes = minutes_from_hours(hours).max(0);
                format!("{}:{:02}", minutes / 60, minutes % 60)
            }
            Err(_) => value.to_text(),
        },
        _ => value.to_text(),
    }
}

//==============================================================================
// Days
//==============================================================================

/// Where a day string came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaysSource {
    /// A real date cell
    DateCell,
    /// Text that happened to read as a date
    TextDate,
    /// The known corrupted cell, replaced by [`CORRECTED_DAYS`]
    Corrected,
    /// Free text, whitespace cleaned
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysValue {
    pub text: String,
    pub source: DaysSource,
}

/// Parse a strike-days cell into display text
pub fn parse_days(value: &CellValue) -> DaysValue {
    let (date, source) = match value {
        CellValue::DateTime(dt) => (Some(dt.date()), DaysSource::DateCell),
        CellValue::Text(s) => (parse_text_date(s), DaysSource::TextDate),
        _ => (None, DaysSource::FreeText),
    };

    match date {
        Some(d) if d.year() == CORRUPTED_YEAR => DaysValue {
            text: CORRECTED_DAYS.to_string(),
            source: DaysSource::Corrected,
        },
        Some(d) => DaysValue {
            text: format!("{:02}", d.day()),
            source,
        },
        None => DaysValue {
            text: if value.is_empty() {
                String::new()
            } else {
                clean_free_text(&value.to_text())
            },
            source: DaysSource::FreeText,
        },
    }
}

/// Display text of a strike-days cell
pub fn format_days(value: &CellValue) -> String {
    parse_days(value).text
}

/// Read text as a calendar date.
///
/// `YYYY-MM-DD` style is read year-first; any other three-number group is
/// read day-first, then month-first when day-first is not a real date.
pub fn parse_text_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if let Some(caps) = ISO_DATE.captures(s) {
        let y: i32 = caps[1].parse().ok()?;
        let m: u32 = caps[2].parse().ok()?;
        let d: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }

    let caps = NUMBER_TRIPLE.captures(s)?;
    let a: u32 = caps[1].parse().ok()?;
    let b: u32 = caps[2].parse().ok()?;
    let year_text = &caps[3];
    let mut y: i32 = year_text.parse().ok()?;
    if year_text.len() == 2 {
        y += if y < 69 { 2000 } else { 1900 };
    }

    NaiveDate::from_ymd_opt(y, b, a).or_else(|| NaiveDate::from_ymd_opt(y, a, b))
}

/// Collapse whitespace runs to one space and put exactly one space after commas
pub fn clean_free_text(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    let spaced = COMMA_SPACING.replace_all(collapsed.trim(), ", ");
    spaced.trim().to_string()
}
