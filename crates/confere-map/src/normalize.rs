//! Column normalization onto the canonical field set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use confere_model::{CanonicalField, Dataset, Record};

use crate::alias::AliasTable;
use crate::error::{MapError, Result};

/// One accepted source-column rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Source column label as it appeared in the input.
    pub source: String,
    /// Canonical field the column was renamed to.
    pub field: CanonicalField,
}

/// What normalization did to a dataset's columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Renamed columns, in source order.
    pub mapped: Vec<ColumnMapping>,
    /// Columns that matched no alias and passed through unchanged.
    pub passthrough: Vec<String>,
}

impl NormalizationReport {
    #[must_use]
    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        self.mapped.iter().any(|mapping| mapping.field == field)
    }

    /// Of the given fields, those that no source column mapped to.
    pub fn missing(
        &self,
        fields: impl IntoIterator<Item = CanonicalField>,
    ) -> Vec<CanonicalField> {
        fields
            .into_iter()
            .filter(|field| !self.is_mapped(*field))
            .collect()
    }
}

/// A dataset with canonical column labels, plus the rename report.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub dataset: Dataset,
    pub report: NormalizationReport,
}

/// Rename every column whose label matches an alias to its canonical field.
///
/// Pure: returns a new dataset, the input is untouched. Unmapped columns
/// keep their original label and position. At most one source column may
/// claim each canonical field; a second claim is [`MapError::AmbiguousMapping`].
///
/// Already-canonical labels resolve to themselves, so normalizing twice is
/// a no-op.
pub fn normalize_columns(dataset: &Dataset, aliases: &AliasTable) -> Result<Normalized> {
    let mut claimed: BTreeMap<CanonicalField, String> = BTreeMap::new();
    let mut columns = Vec::with_capacity(dataset.columns.len());
    let mut report = NormalizationReport::default();

    for column in &dataset.columns {
        match aliases.resolve(column) {
            Some(field) => {
                if let Some(first) = claimed.get(&field) {
                    return Err(MapError::AmbiguousMapping {
                        dataset: dataset.name.clone(),
                        field,
                        first: first.clone(),
                        second: column.clone(),
                    });
                }
                claimed.insert(field, column.clone());
                columns.push(field.as_str().to_string());
                report.mapped.push(ColumnMapping {
                    source: column.clone(),
                    field,
                });
            }
            None => {
                columns.push(column.clone());
                report.passthrough.push(column.clone());
            }
        }
    }

    let mut normalized = Dataset::new(dataset.name.clone(), columns);
    for row in &dataset.rows {
        let mut record = Record::default();
        for (source, target) in dataset.columns.iter().zip(&normalized.columns) {
            if let Some(cell) = row.get(source) {
                record.insert(target.clone(), cell.clone());
            }
        }
        normalized.push_row(record);
    }

    Ok(Normalized {
        dataset: normalized,
        report,
    })
}

#[cfg(test)]
mod tests {
    use confere_model::CellValue;

    use super::*;

    fn dataset(name: &str, columns: &[&str], rows: &[&[&str]]) -> Dataset {
        let mut out = Dataset::new(
            name,
            columns.iter().map(|label| (*label).to_string()).collect(),
        );
        for row in rows {
            let record: Record = columns
                .iter()
                .zip(row.iter())
                .map(|(column, value)| {
                    (
                        (*column).to_string(),
                        CellValue::Text((*value).to_string()),
                    )
                })
                .collect();
            out.push_row(record);
        }
        out
    }

    #[test]
    fn renames_aliased_columns_and_keeps_the_rest() {
        let input = dataset(
            "pagseguro",
            &["Data Venda", "Valor Bruto", "Loja", "Taxa"],
            &[&["2025-01-01", "100.00", "Loja 1", "2.50"]],
        );
        let normalized = normalize_columns(&input, &AliasTable::default_ptbr()).unwrap();

        assert_eq!(
            normalized.dataset.columns,
            vec!["data", "valor", "loja", "Taxa"]
        );
        assert_eq!(
            normalized.dataset.rows[0].get("valor"),
            Some(&CellValue::Text("100.00".to_string()))
        );
        assert_eq!(normalized.report.passthrough, vec!["Taxa"]);
        assert!(normalized.report.is_mapped(CanonicalField::Valor));
        // Input is untouched.
        assert_eq!(input.columns[0], "Data Venda");
    }

    #[test]
    fn alias_variants_all_land_on_codigo_nsu() {
        for label in ["NSU", "código nsu", "Código"] {
            let input = dataset("extrato", &[label], &[&["123"]]);
            let normalized = normalize_columns(&input, &AliasTable::default_ptbr()).unwrap();
            assert_eq!(normalized.dataset.columns, vec!["codigo_nsu"]);
        }
    }

    #[test]
    fn unlisted_label_passes_through() {
        let input = dataset("extrato", &["NSU Code"], &[&["123"]]);
        let normalized = normalize_columns(&input, &AliasTable::default_ptbr()).unwrap();
        assert_eq!(normalized.dataset.columns, vec!["NSU Code"]);
        assert_eq!(normalized.report.mapped, vec![]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = dataset(
            "extrato",
            &["Data", "Valor", "Unidade", "Observação"],
            &[&["2025-01-01", "100.00", "Loja 1", "ok"]],
        );
        let aliases = AliasTable::default_ptbr();
        let once = normalize_columns(&input, &aliases).unwrap();
        let twice = normalize_columns(&once.dataset, &aliases).unwrap();
        assert_eq!(twice.dataset, once.dataset);
    }

    #[test]
    fn duplicate_claims_on_one_field_are_rejected() {
        let input = dataset(
            "rede",
            &["Valor", "Valor Bruto"],
            &[&["100.00", "100.00"]],
        );
        let error = normalize_columns(&input, &AliasTable::default_ptbr()).unwrap_err();
        assert_eq!(
            error,
            MapError::AmbiguousMapping {
                dataset: "rede".to_string(),
                field: CanonicalField::Valor,
                first: "Valor".to_string(),
                second: "Valor Bruto".to_string(),
            }
        );
    }

    #[test]
    fn missing_lists_unmapped_required_fields() {
        let input = dataset("extrato", &["Data", "Loja"], &[&["2025-01-01", "Loja 1"]]);
        let normalized = normalize_columns(&input, &AliasTable::default_ptbr()).unwrap();
        let missing = normalized.report.missing([
            CanonicalField::Data,
            CanonicalField::Valor,
            CanonicalField::Loja,
        ]);
        assert_eq!(missing, vec![CanonicalField::Valor]);
    }
}
