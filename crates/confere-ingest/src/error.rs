//! Error types for ledger and settlement ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading source spreadsheets.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV content.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to open an Excel workbook.
    #[error("failed to open workbook {path}: {message}")]
    WorkbookOpen { path: PathBuf, message: String },

    /// Requested worksheet does not exist.
    #[error("worksheet '{sheet}' not found in {path}")]
    SheetNotFound { sheet: String, path: PathBuf },

    /// File parsed but contained no data rows.
    #[error("no data rows found in {path}")]
    EmptyTable { path: PathBuf },

    /// File extension is not a supported tabular format.
    #[error("unsupported input format: {path} (expected .csv, .xlsx, .xls or .ods)")]
    UnsupportedFormat { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_not_found_names_the_sheet() {
        let error = IngestError::SheetNotFound {
            sheet: "Vendas".to_string(),
            path: PathBuf::from("extrato.xlsx"),
        };
        assert_eq!(
            error.to_string(),
            "worksheet 'Vendas' not found in extrato.xlsx"
        );
    }
}
