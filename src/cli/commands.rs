use crate::config::Config;
use crate::error::{StrikeError, StrikeResult};
use crate::export::ReportExporter;
use crate::loader::SpreadsheetLoader;
use crate::report::{DataIssue, HoursDisplay, Report, ReportAggregator};
use crate::search::{search_names, EmptyQuery};
use crate::types::{CanonicalTable, MonthData};
use clap::ValueEnum;
use colored::Colorize;
use std::path::PathBuf;

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Yaml,
    Json,
}

/// Load the configured workbook, or fail with "no data available"
pub fn load_data(config: &Config) -> StrikeResult<MonthData> {
    let loader = SpreadsheetLoader::from_config(config);
    match loader.load_or_none() {
        Some(data) if !data.is_empty() => Ok(data),
        Some(_) => Err(StrikeError::NoData(format!(
            "no sheet with a name column in {}",
            config.source.display()
        ))),
        None => Err(StrikeError::NoData(format!(
            "could not read {}",
            config.source.display()
        ))),
    }
}

/// Execute the months command - list loaded months
pub fn months(config: &Config) -> StrikeResult<()> {
    let data = load_data(config)?;

    println!("{}", "📅 Strike Hours - Months".bold().green());
    println!("   File: {}\n", config.source.display());

    for table in data.iter() {
        println!(
            "   {} {:>5} rows   (sheet: {})",
            format!("{:<12}", table.month_label).bright_blue().bold(),
            table.len(),
            table.sheet_name
        );
    }
    println!("\n   {} months, {} records", data.len(), data.total_records());
    Ok(())
}

/// Execute the search command - list names containing the query
pub fn search(config: &Config, query: &str, empty: EmptyQuery) -> StrikeResult<Vec<String>> {
    let data = load_data(config)?;
    let names = search_names(&data, query, empty);

    println!("{}", "🔍 Strike Hours - Search".bold().green());
    println!("   Query: {}\n", query.bright_yellow());

    if names.is_empty() {
        println!("{}", "   No employee found".yellow());
    } else {
        for name in &names {
            println!("   {}", name);
        }
        println!("\n   {} match(es)", names.len());
    }
    Ok(names)
}

/// Execute the report command - aggregate one employee across months
pub fn report(
    config: &Config,
    name: &str,
    display: HoursDisplay,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> StrikeResult<Report> {
    let data = load_data(config)?;
    let report = ReportAggregator::from_config(config)
        .with_display(display)
        .aggregate(&data, name);

    match format {
        OutputFormat::Table => print_report(&report),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.is_empty() {
        return Ok(report);
    }

    if let Some(path) = output {
        ReportExporter::new(&report).export(&path)?;
        if format == OutputFormat::Table {
            println!(
                "{}",
                format!("💾 Saved: {}", path.display()).bright_green()
            );
        }
    }

    Ok(report)
}

/// Execute the dump command - show normalized tables as YAML
pub fn dump(config: &Config, month: Option<String>) -> StrikeResult<()> {
    let data = load_data(config)?;

    match month {
        Some(label) => {
            let table = find_month(&data, &label)?;
            print!("{}", serde_yaml::to_string(table)?);
        }
        None => print!("{}", serde_yaml::to_string(&data)?),
    }
    Ok(())
}

fn find_month<'a>(data: &'a MonthData, label: &str) -> StrikeResult<&'a CanonicalTable> {
    let wanted = label.trim().to_uppercase();
    data.iter()
        .find(|t| t.month_label.to_uppercase() == wanted)
        .ok_or_else(|| {
            StrikeError::NotFound(format!(
                "month '{}' (available: {})",
                label,
                data.labels().join(", ")
            ))
        })
}

fn print_report(report: &Report) {
    println!("{}", "📋 Strike Hours - Report".bold().green());
    println!("   Employee: {}\n", report.employee.bright_blue().bold());

    if report.is_empty() {
        println!("{}", "   No records found for this name".yellow());
        return;
    }

    println!(
        "   {}",
        format!("{:<12} {:<20} {:>10}", "Mês", "Dias", "Hrs").bold()
    );
    for row in &report.rows {
        println!(
            "   {:<12} {:<20} {:>10}",
            row.month, row.days, row.hours_display
        );
    }

    println!();
    println!(
        "   {}",
        format!("TOTAL: {} HORAS", report.total_display)
            .bright_red()
            .bold()
    );

    if !report.issues.is_empty() {
        println!(
            "\n{}",
            format!("⚠️  {} value(s) need review", report.issues.len()).yellow()
        );
        for issue in &report.issues {
            println!("   {}", describe_issue(issue));
        }
    }
    println!();
}

fn describe_issue(issue: &DataIssue) -> String {
    match issue {
        DataIssue::UnparseableHours { month, raw, reason } => {
            format!("{}: hours '{}' counted as 0 ({})", month, raw, reason)
        }
        DataIssue::TextDate { month, raw, days } => {
            format!("{}: days text '{}' read as a date, shown as '{}'", month, raw, days)
        }
        DataIssue::MissingColumn { month, column } => {
            format!("{}: no {} column", month, column)
        }
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
