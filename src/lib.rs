//! Strike Hours - proof-of-hours lookup over a monthly strike spreadsheet
//!
//! This library loads a multi-sheet workbook (one sheet per month), normalizes
//! each loosely structured sheet into a uniform table, and aggregates one
//! employee's strike days and hours across all months.
//!
//! # Pipeline
//!
//! - [`loader::SpreadsheetLoader`] reads every sheet (ods, xlsx, xls)
//! - [`sheet::SheetNormalizer`] finds the header row and builds records
//! - [`search::search_names`] lists matching employee names
//! - [`report::ReportAggregator`] builds the per-month rows and the total
//! - [`export::ReportExporter`] writes the downloadable artifact
//!
//! # Example
//!
//! ```no_run
//! use strike_hours::loader::SpreadsheetLoader;
//! use strike_hours::report::{build_report, HoursDisplay};
//! use strike_hours::search::{search_names, EmptyQuery};
//!
//! let data = SpreadsheetLoader::new("horas_greve.ods").load()?;
//!
//! for name in search_names(&data, "carlos", EmptyQuery::MatchNone) {
//!     let report = build_report(&data, &name, HoursDisplay::Numeric);
//!     println!("{}: {} hours", report.employee, report.total_display);
//! }
//! # Ok::<(), strike_hours::error::StrikeError>(())
//! ```

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod parsers;
pub mod report;
pub mod search;
pub mod sheet;
pub mod types;

// Re-export commonly used types
pub use error::{StrikeError, StrikeResult};
pub use report::{HoursDisplay, Report, ReportRow};
pub use types::{CanonicalTable, CellValue, MonthData, RawSheet, Record};
