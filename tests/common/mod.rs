//! Shared workbook fixture for integration tests

#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub enum Cell {
    Text(&'static str),
    Number(f64),
    Date(u16, u8, u8),
    /// Elapsed hours and minutes in a `[h]:mm` cell
    Time(u16, u8),
    Blank,
}

use Cell::{Blank, Date, Number, Text, Time};

fn write_rows(sheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<(), XlsxError> {
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let time_format = Format::new().set_num_format("[h]:mm");
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Text(s) => {
                    sheet.write_string(r, c, *s)?;
                }
                Number(n) => {
                    sheet.write_number(r, c, *n)?;
                }
                Date(y, m, d) => {
                    let date = ExcelDateTime::from_ymd(*y, *m, *d)?;
                    sheet.write_datetime_with_format(r, c, &date, &date_format)?;
                }
                Time(h, m) => {
                    let time = ExcelDateTime::from_hms(*h, *m, 0)?;
                    sheet.write_datetime_with_format(r, c, &time, &time_format)?;
                }
                Blank => {}
            }
        }
    }
    Ok(())
}

pub fn write_workbook(path: &Path, sheets: Vec<(&str, Vec<Vec<Cell>>)>) {
    let mut workbook = Workbook::new();
    for (name, rows) in &sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        write_rows(sheet, rows).unwrap();
    }
    workbook.save(path).unwrap();
}

/// Three month sheets shaped like the real strike workbook, plus a summary
/// sheet without a name column.
///
/// | employee       | NOV/2025 | DEZ/2025 | JAN/2026        |
/// |----------------|----------|----------|-----------------|
/// | CARLOS EDUARDO | 7.5      | 3h30min  | 8h (2010 date)  |
/// | ANA SOUZA      | "8"      | 2:15     | -               |
/// | MARIA LIMA     | "abc"    | -        | -               |
pub fn strike_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("horas_greve.xlsx");
    write_workbook(
        &path,
        vec![
            (
                "NOVEMBRO25",
                vec![
                    vec![Text("SINDICATO DOS SERVIDORES - HORAS DE GREVE")],
                    vec![],
                    vec![Text("NOME"), Text("DATA"), Text("HORAS /GREVE"), Text("SETOR")],
                    vec![Text("Carlos Eduardo"), Date(2025, 11, 12), Number(7.5), Text("TI")],
                    vec![Text("Ana Souza"), Text("13/11/2025"), Text("8"), Blank],
                    vec![],
                    vec![Text("Maria Lima"), Text("14"), Text("abc")],
                ],
            ),
            (
                "Resumo",
                vec![vec![Text("TOTAL GERAL"), Number(29.25)]],
            ),
            (
                "DEZEMBRO 25",
                vec![
                    vec![Text("Nome"), Text("Datas"), Text("Horas Greve")],
                    vec![Text("CARLOS EDUARDO "), Text("03,04"), Text("3h30min")],
                    vec![Text("ana souza"), Text("05"), Text("2:15")],
                ],
            ),
            (
                "JANEIRO 26",
                vec![
                    vec![Text("JANEIRO 2026")],
                    vec![Text("NOME"), Text("DATA"), Text("HORAS /GREVE")],
                    vec![Text("Carlos Eduardo"), Date(2010, 1, 5), Text("8h")],
                ],
            ),
        ],
    );
    path
}
