use super::*;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixtures
// =========================================================================

/// Write a workbook where every sheet is a list of text rows
fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<&str>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn strike_workbook(dir: &TempDir) -> Config {
    let path = dir.path().join("horas.xlsx");
    write_workbook(
        &path,
        &[
            (
                "NOVEMBRO25",
                vec![
                    vec!["SINDICATO - HORAS DE GREVE"],
                    vec![],
                    vec!["NOME", "DATA", "HORAS /GREVE"],
                    vec!["Carlos Eduardo", "12/11/2025", "7,5"],
                    vec!["Ana Souza", "13/11/2025", "8"],
                ],
            ),
            ("Resumo", vec![vec!["TOTAL GERAL", "15,5"]]),
            (
                "DEZEMBRO 25",
                vec![
                    vec!["nome", "data", "horas /greve"],
                    vec!["carlos eduardo", "03, 04", "3h30min"],
                ],
            ),
        ],
    );
    Config::with_source(path)
}

// =========================================================================
// load_data Tests
// =========================================================================

#[test]
fn test_load_data_missing_file_is_no_data() {
    let config = Config::with_source("definitely/missing.ods");
    assert!(matches!(load_data(&config), Err(StrikeError::NoData(_))));
}

#[test]
fn test_load_data_without_data_sheets_is_no_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.xlsx");
    write_workbook(&path, &[("Resumo", vec![vec!["TOTAL", "1"]])]);

    let result = load_data(&Config::with_source(path));
    assert!(matches!(result, Err(StrikeError::NoData(_))));
}

#[test]
fn test_load_data_labels_months() {
    let dir = TempDir::new().unwrap();
    let config = strike_workbook(&dir);
    let data = load_data(&config).unwrap();
    assert_eq!(data.labels(), vec!["NOV/2025", "DEZ/2025"]);
}

// =========================================================================
// Command Tests
// =========================================================================

#[test]
fn test_months_command() {
    let dir = TempDir::new().unwrap();
    let config = strike_workbook(&dir);
    assert!(months(&config).is_ok());
}

#[test]
fn test_search_command() {
    let dir = TempDir::new().unwrap();
    let config = strike_workbook(&dir);

    let names = search(&config, "carlos", EmptyQuery::MatchNone).unwrap();
    assert_eq!(names, vec!["CARLOS EDUARDO"]);

    let none = search(&config, "", EmptyQuery::MatchNone).unwrap();
    assert!(none.is_empty());

    let all = search(&config, "", EmptyQuery::MatchAll).unwrap();
    assert_eq!(all, vec!["ANA SOUZA", "CARLOS EDUARDO"]);
}

#[test]
fn test_report_command_numeric() {
    let dir = TempDir::new().unwrap();
    let config = strike_workbook(&dir);

    let report = report(
        &config,
        "CARLOS EDUARDO",
        HoursDisplay::Numeric,
        None,
        OutputFormat::Table,
    )
    .unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].month, "NOV/2025");
    assert_eq!(report.rows[0].days, "12");
    assert_eq!(report.rows[1].days, "03, 04");
    assert_eq!(report.total_display, "11.00");
}

#[test]
fn test_report_command_literal_writes_artifact() {
    let dir = TempDir::new().unwrap();
    let config = strike_workbook(&dir);
    let output = dir.path().join("Horas_CARLOS.xlsx");

    let report = report(
        &config,
        "carlos eduardo",
        HoursDisplay::Literal,
        Some(output.clone()),
        OutputFormat::Json,
    )
    .unwrap();

    assert_eq!(report.total_display, "11h");
    assert_eq!(report.rows[1].hours_display, "3h30min");
    assert!(output.exists());
}

#[test]
fn test_report_command_unknown_name_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = strike_workbook(&dir);
    let output = dir.path().join("nobody.xlsx");

    let report = report(
        &config,
        "NOBODY",
        HoursDisplay::Numeric,
        Some(output.clone()),
        OutputFormat::Table,
    )
    .unwrap();

    assert!(report.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_dump_command() {
    let dir = TempDir::new().unwrap();
    let config = strike_workbook(&dir);

    assert!(dump(&config, None).is_ok());
    assert!(dump(&config, Some("dez/2025".to_string())).is_ok());
    assert!(matches!(
        dump(&config, Some("MAR/2026".to_string())),
        Err(StrikeError::NotFound(_))
    ));
}

// =========================================================================
// Helper Tests
// =========================================================================

#[test]
fn test_describe_issue() {
    let issue = DataIssue::UnparseableHours {
        month: "NOV/2025".to_string(),
        raw: "abc".to_string(),
        reason: "not a number or duration: 'abc'".to_string(),
    };
    assert!(describe_issue(&issue).starts_with("NOV/2025: hours 'abc' counted as 0"));

    let missing = DataIssue::MissingColumn {
        month: "DEZ/2025".to_string(),
        column: "date".to_string(),
    };
    assert_eq!(describe_issue(&missing), "DEZ/2025: no date column");
}

#[test]
fn test_output_format_default() {
    assert_eq!(OutputFormat::default(), OutputFormat::Table);
}
