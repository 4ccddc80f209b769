use std::path::Path;

use confere_model::Dataset;

use crate::csv_table::read_csv_table;
use crate::error::{IngestError, Result};
use crate::xlsx::read_xlsx_table;

/// Knobs for reading one source file.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// CSV delimiter; sniffed between `;` and `,` when unset.
    pub delimiter: Option<u8>,
    /// Worksheet name for Excel inputs; first sheet when unset.
    pub sheet: Option<String>,
}

/// Read any supported tabular file into a dataset, dispatching on extension.
///
/// `name` is the dataset label used in diagnostics and summaries; callers
/// usually pass the file stem or the processor name ("pagseguro", "rede").
pub fn read_table(path: &Path, name: &str, options: &IngestOptions) -> Result<Dataset> {
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" | "txt" => Ok(read_csv_table(path, options)?.into_dataset(name)),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_xlsx_table(path, name, options),
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Dataset label derived from a file path: the lowercased stem.
#[must_use]
pub fn dataset_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "dataset".to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn unsupported_extension_is_rejected() {
        let error = read_table(
            &PathBuf::from("extrato.pdf"),
            "extrato",
            &IngestOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(error, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn dataset_name_uses_lowercased_stem() {
        assert_eq!(
            dataset_name_from_path(&PathBuf::from("/tmp/PAGSEGURO.xlsx")),
            "pagseguro"
        );
    }
}
