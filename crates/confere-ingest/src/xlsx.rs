//! Excel ingestion via calamine.
//!
//! Unlike CSV, workbook cells arrive typed: floats, booleans, and date
//! serials. Dates and amounts are kept typed so the matcher can compare
//! them without re-parsing rendered text.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::debug;

use confere_model::{CellValue, Dataset, Record};

use crate::error::{IngestError, Result};
use crate::header::{dedupe_headers, detect_header_row, normalize_cell, normalize_header};
use crate::source::IngestOptions;

/// Read one worksheet into a model dataset.
///
/// Uses the worksheet named in `options.sheet`, or the first sheet of the
/// workbook otherwise. Header-row detection works on rendered cell text,
/// the same way the CSV path does.
pub fn read_xlsx_table(path: &Path, name: &str, options: &IngestOptions) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path).map_err(|error| IngestError::WorkbookOpen {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet = match &options.sheet {
        Some(requested) => sheet_names
            .iter()
            .find(|candidate| candidate.as_str() == requested)
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                sheet: requested.clone(),
                path: path.to_path_buf(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IngestError::EmptyTable {
                path: path.to_path_buf(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|error| IngestError::WorkbookOpen {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;

    let mut grid: Vec<Vec<CellValue>> = Vec::new();
    for row in range.rows() {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        if cells.iter().all(CellValue::is_missing) {
            continue;
        }
        grid.push(cells);
    }
    if grid.is_empty() {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let rendered: Vec<Vec<String>> = grid
        .iter()
        .map(|row| row.iter().map(CellValue::render).collect())
        .collect();
    let header_index = detect_header_row(&rendered);
    let headers = dedupe_headers(
        rendered[header_index]
            .iter()
            .map(|value| normalize_header(value))
            .collect(),
    );

    let mut dataset = Dataset::new(name, headers.clone());
    for row in grid.into_iter().skip(header_index + 1) {
        let mut record = Record::default();
        for (idx, header) in headers.iter().enumerate() {
            let cell = row.get(idx).cloned().unwrap_or(CellValue::Missing);
            record.insert(header.clone(), cell);
        }
        dataset.push_row(record);
    }
    if dataset.rows.is_empty() {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    debug!(
        path = %path.display(),
        sheet = %sheet,
        header_row = header_index,
        column_count = dataset.columns.len(),
        row_count = dataset.height(),
        "worksheet read"
    );
    Ok(dataset)
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Missing,
        Data::String(text) => {
            let cleaned = normalize_cell(text);
            if cleaned.is_empty() {
                CellValue::Missing
            } else {
                CellValue::Text(cleaned)
            }
        }
        Data::Float(number) => decimal_cell(*number),
        Data::Int(number) => CellValue::Number(Decimal::from(*number)),
        Data::Bool(flag) => CellValue::Text(if *flag { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(error) => CellValue::Text(format!("#{error:?}")),
        Data::DateTime(datetime) => match datetime.as_datetime() {
            Some(parsed) => CellValue::Date(parsed.date()),
            None => decimal_cell(datetime.as_f64()),
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => {
            CellValue::Text(normalize_cell(text))
        }
    }
}

fn decimal_cell(number: f64) -> CellValue {
    match Decimal::from_f64(number) {
        Some(decimal) => CellValue::Number(decimal.normalize()),
        None => CellValue::Missing,
    }
}

#[cfg(test)]
mod tests {
    use rust_xlsxwriter::Workbook;

    use super::*;

    fn write_fixture(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("extrato.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Data").unwrap();
        worksheet.write_string(0, 1, "Valor").unwrap();
        worksheet.write_string(0, 2, "Loja").unwrap();
        worksheet.write_string(1, 0, "2025-01-01").unwrap();
        worksheet.write_number(1, 1, 100.0).unwrap();
        worksheet.write_string(1, 2, "Loja 1").unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn reads_typed_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());
        let dataset = read_xlsx_table(&path, "extrato", &IngestOptions::default()).unwrap();
        assert_eq!(dataset.columns, vec!["Data", "Valor", "Loja"]);
        assert_eq!(dataset.height(), 1);
        assert_eq!(
            dataset.rows[0].get("Valor"),
            Some(&CellValue::Number(Decimal::from(100)))
        );
        assert_eq!(
            dataset.rows[0].get("Loja"),
            Some(&CellValue::Text("Loja 1".to_string()))
        );
    }

    #[test]
    fn missing_sheet_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());
        let options = IngestOptions {
            sheet: Some("Vendas".to_string()),
            ..IngestOptions::default()
        };
        let error = read_xlsx_table(&path, "extrato", &options).unwrap_err();
        assert!(matches!(
            error,
            IngestError::SheetNotFound { ref sheet, .. } if sheet == "Vendas"
        ));
    }
}
