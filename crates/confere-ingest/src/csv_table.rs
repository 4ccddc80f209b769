use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use confere_model::{CellValue, Dataset, Record};

use crate::error::{IngestError, Result};
use crate::header::{dedupe_headers, detect_header_row, normalize_cell, normalize_header};
use crate::source::IngestOptions;

/// Raw CSV content: cleaned headers plus string rows aligned to them.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Convert into a model dataset of text cells; empty cells become missing.
    #[must_use]
    pub fn into_dataset(self, name: &str) -> Dataset {
        let mut dataset = Dataset::new(name, self.headers.clone());
        for row in self.rows {
            let record: Record = self
                .headers
                .iter()
                .zip(row)
                .map(|(header, value)| {
                    let cell = if value.trim().is_empty() {
                        CellValue::Missing
                    } else {
                        CellValue::Text(value)
                    };
                    (header.clone(), cell)
                })
                .collect();
            dataset.push_row(record);
        }
        dataset
    }
}

/// Guess the delimiter from the first non-empty line.
///
/// Brazilian exports commonly use `;`, bank portals `,`.
fn sniff_delimiter(path: &Path) -> Result<u8> {
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|source| IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            return Ok(b',');
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    let semicolons = line.matches(';').count();
    let commas = line.matches(',').count();
    Ok(if semicolons > commas { b';' } else { b',' })
}

/// Read a CSV file into a [`CsvTable`], detecting the header row.
pub fn read_csv_table(path: &Path, options: &IngestOptions) -> Result<CsvTable> {
    let delimiter = match options.delimiter {
        Some(delimiter) => delimiter,
        None => sniff_delimiter(path)?,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|error| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let header_index = detect_header_row(&raw_rows);
    let headers = dedupe_headers(
        raw_rows[header_index]
            .iter()
            .map(|value| normalize_header(value))
            .collect(),
    );
    let mut rows = Vec::new();
    for record in raw_rows.iter().skip(header_index + 1) {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).map(String::as_str).unwrap_or("");
            row.push(normalize_cell(value));
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    debug!(
        path = %path.display(),
        delimiter = %char::from(delimiter),
        header_row = header_index,
        column_count = headers.len(),
        row_count = rows.len(),
        "csv table read"
    );
    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_fixture(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp csv");
        file.write_all(content.as_bytes()).expect("write fixture");
        file
    }

    #[test]
    fn reads_comma_separated_table() {
        let file = write_fixture("Data,Valor,Loja\n2025-01-01,100.00,Loja 1\n");
        let table = read_csv_table(file.path(), &IngestOptions::default()).unwrap();
        assert_eq!(table.headers, vec!["Data", "Valor", "Loja"]);
        assert_eq!(table.rows, vec![vec!["2025-01-01", "100.00", "Loja 1"]]);
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        let file = write_fixture("Data;Valor;Loja\n02/01/2025;59,90;Loja 2\n");
        let table = read_csv_table(file.path(), &IngestOptions::default()).unwrap();
        assert_eq!(table.headers, vec!["Data", "Valor", "Loja"]);
        assert_eq!(table.rows[0][1], "59,90");
    }

    #[test]
    fn skips_preamble_and_blank_rows() {
        let file = write_fixture(
            "Relatório de vendas,,\n\
             ,,\n\
             Data,Valor,Loja\n\
             2025-01-01,100.00,Loja 1\n",
        );
        let table = read_csv_table(file.path(), &IngestOptions::default()).unwrap();
        assert_eq!(table.headers, vec!["Data", "Valor", "Loja"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn short_rows_are_padded() {
        let file = write_fixture("Data,Valor,Loja\n2025-01-01,100.00\n");
        let table = read_csv_table(file.path(), &IngestOptions::default()).unwrap();
        assert_eq!(table.rows[0], vec!["2025-01-01", "100.00", ""]);
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_fixture("");
        let error = read_csv_table(file.path(), &IngestOptions::default()).unwrap_err();
        assert!(matches!(error, IngestError::EmptyTable { .. }));
    }

    #[test]
    fn header_only_file_is_rejected() {
        let file = write_fixture("Data,Valor,Loja\n");
        let error = read_csv_table(file.path(), &IngestOptions::default()).unwrap_err();
        assert!(matches!(error, IngestError::EmptyTable { .. }));
    }

    #[test]
    fn dataset_conversion_marks_empty_cells_missing() {
        let table = CsvTable {
            headers: vec!["data".to_string(), "valor".to_string()],
            rows: vec![vec!["2025-01-01".to_string(), String::new()]],
        };
        let dataset = table.into_dataset("extrato");
        assert_eq!(dataset.name, "extrato");
        assert_eq!(
            dataset.rows[0].get("data"),
            Some(&CellValue::Text("2025-01-01".to_string()))
        );
        assert_eq!(dataset.rows[0].get("valor"), Some(&CellValue::Missing));
    }
}
