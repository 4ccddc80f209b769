//! Plain CSV output of the annotated table.
//!
//! No colors, just the status column — the toolchain-friendly twin of the
//! Excel export.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use confere_match::ReconciledDataset;
use confere_model::CellValue;

/// Write the annotated dataset (status column included) as CSV.
pub fn write_csv(path: &Path, reconciled: &ReconciledDataset) -> Result<()> {
    let annotated = reconciled.annotated();
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(&annotated.columns)
        .context("write csv header")?;
    for record in &annotated.rows {
        let row: Vec<String> = annotated
            .columns
            .iter()
            .map(|column| record.get(column).unwrap_or(&CellValue::Missing).render())
            .collect();
        writer.write_record(&row).context("write csv row")?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    debug!(
        path = %path.display(),
        row_count = annotated.height(),
        "csv written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use confere_match::{MatchOptions, reconcile};
    use confere_model::{Dataset, Record};

    use super::*;

    #[test]
    fn csv_contains_status_column() {
        let mut primary = Dataset::new(
            "extrato",
            vec!["data".to_string(), "valor".to_string(), "loja".to_string()],
        );
        primary.push_row(
            [("data", "2025-01-01"), ("valor", "100.00"), ("loja", "A")]
                .into_iter()
                .map(|(column, value)| {
                    (column.to_string(), CellValue::Text(value.to_string()))
                })
                .collect::<Record>(),
        );
        let comparison = primary.clone();
        let result = reconcile(&primary, &[comparison], &MatchOptions::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resultado.csv");
        write_csv(&path, &result.primary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "data,valor,loja,status\n2025-01-01,100.00,A,Conferido\n"
        );
    }
}
