//! Key-tuple index over a comparison dataset.
//!
//! Built once per dataset, then probed in O(1) per primary record. This
//! replaces re-scanning every comparison row for every primary row, which
//! does not hold up at settlement-report sizes.

use std::collections::HashMap;

use confere_model::{Dataset, Record};

use crate::error::{MatchError, Result};
use crate::key::KeyFieldSet;
use crate::value::{Canonical, KeyValue, ParseOptions, canonicalize};

/// A record's canonical key, one value per key field, in key order.
pub type KeyTuple = Vec<KeyValue>;

/// Canonical key tuple for one record, or `None` when any component is
/// missing/empty (such records can never match).
///
/// `row` is the 1-based data row number used in error messages.
pub fn key_tuple(
    dataset_name: &str,
    row: usize,
    record: &Record,
    key: &KeyFieldSet,
    options: &ParseOptions,
) -> Result<Option<KeyTuple>> {
    let mut tuple = Vec::with_capacity(key.len());
    for field in key.fields() {
        let cell = record.get(field.as_str());
        let canonical = match cell {
            Some(cell) => canonicalize(*field, cell, options),
            None => Canonical::Missing,
        };
        match canonical {
            Canonical::Value(value) => tuple.push(value),
            Canonical::Missing => return Ok(None),
            Canonical::Invalid(value) => {
                return Err(MatchError::NotComparable {
                    dataset: dataset_name.to_string(),
                    row,
                    field: *field,
                    value,
                });
            }
        }
    }
    Ok(Some(tuple))
}

/// Positions of every complete key tuple in one dataset.
#[derive(Debug, Default)]
pub struct KeyIndex {
    positions: HashMap<KeyTuple, Vec<usize>>,
}

impl KeyIndex {
    /// Index a dataset by its canonical key tuples. Records with missing
    /// key components are skipped; unparseable non-empty values fail.
    pub fn build(dataset: &Dataset, key: &KeyFieldSet, options: &ParseOptions) -> Result<Self> {
        let mut positions: HashMap<KeyTuple, Vec<usize>> = HashMap::new();
        for (idx, record) in dataset.rows.iter().enumerate() {
            if let Some(tuple) = key_tuple(&dataset.name, idx + 1, record, key, options)? {
                positions.entry(tuple).or_default().push(idx);
            }
        }
        Ok(Self { positions })
    }

    #[must_use]
    pub fn contains(&self, tuple: &KeyTuple) -> bool {
        self.positions.contains_key(tuple)
    }

    /// Number of distinct key tuples indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use confere_model::CellValue;

    use super::*;

    fn record(entries: &[(&str, &str)]) -> Record {
        entries
            .iter()
            .map(|(column, value)| {
                (
                    (*column).to_string(),
                    CellValue::Text((*value).to_string()),
                )
            })
            .collect()
    }

    #[test]
    fn equivalent_rows_share_one_tuple() {
        let key = KeyFieldSet::default();
        let options = ParseOptions::default();
        let mut dataset = Dataset::new(
            "pagseguro",
            vec!["data".to_string(), "valor".to_string(), "loja".to_string()],
        );
        dataset.push_row(record(&[
            ("data", "2025-01-02"),
            ("valor", "100.00"),
            ("loja", "Loja 1"),
        ]));
        dataset.push_row(record(&[
            ("data", "02/01/2025"),
            ("valor", "R$ 100,00"),
            ("loja", "Loja 1"),
        ]));
        let index = KeyIndex::build(&dataset, &key, &options).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn rows_with_missing_components_are_not_indexed() {
        let key = KeyFieldSet::default();
        let options = ParseOptions::default();
        let mut dataset = Dataset::new(
            "rede",
            vec!["data".to_string(), "valor".to_string(), "loja".to_string()],
        );
        dataset.push_row(record(&[
            ("data", "2025-01-02"),
            ("valor", ""),
            ("loja", "Loja 1"),
        ]));
        let index = KeyIndex::build(&dataset, &key, &options).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn unparseable_values_fail_with_position() {
        let key = KeyFieldSet::default();
        let options = ParseOptions::default();
        let mut dataset = Dataset::new(
            "rede",
            vec!["data".to_string(), "valor".to_string(), "loja".to_string()],
        );
        dataset.push_row(record(&[
            ("data", "2025-01-02"),
            ("valor", "cem"),
            ("loja", "Loja 1"),
        ]));
        let error = KeyIndex::build(&dataset, &key, &options).unwrap_err();
        assert_eq!(
            error,
            MatchError::NotComparable {
                dataset: "rede".to_string(),
                row: 1,
                field: confere_model::CanonicalField::Valor,
                value: "cem".to_string(),
            }
        );
    }
}
