use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
    Missing,
}

impl CellValue {
    /// True when the cell carries no usable value.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Number(_) | CellValue::Date(_) => false,
        }
    }

    /// Canonical textual rendering: dates as ISO, missing as empty.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(number) => number.to_string(),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            CellValue::Missing => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    pub cells: BTreeMap<String, CellValue>,
}

impl Record {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }
}

impl FromIterator<(String, CellValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Record {
            cells: iter.into_iter().collect(),
        }
    }
}

/// An ordered batch of records sharing one schema.
///
/// `columns` preserves source column order; record cells are keyed by the
/// labels listed there. `name` identifies the dataset in diagnostics
/// ("extrato", "pagseguro", ...).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Record) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|column| column == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_cell_with_only_whitespace_is_missing() {
        assert!(CellValue::Text("   ".to_string()).is_missing());
        assert!(CellValue::Missing.is_missing());
        assert!(!CellValue::Text("Loja 1".to_string()).is_missing());
    }

    #[test]
    fn render_is_canonical() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(CellValue::Date(date).render(), "2025-01-10");
        assert_eq!(CellValue::Missing.render(), "");
        assert_eq!(
            CellValue::Number(Decimal::new(9990, 2)).render(),
            "99.90"
        );
    }

    #[test]
    fn dataset_tracks_columns_and_rows() {
        let mut dataset = Dataset::new("extrato", vec!["data".to_string(), "valor".to_string()]);
        assert!(dataset.has_column("data"));
        assert!(!dataset.has_column("loja"));

        let mut record = Record::default();
        record.insert("data", CellValue::Text("2025-01-01".to_string()));
        dataset.push_row(record);
        assert_eq!(dataset.height(), 1);
    }
}
