pub mod field;
pub mod status;
pub mod summary;
pub mod table;

pub use field::{CanonicalField, FieldKind, UnknownFieldError};
pub use status::{MatchStatus, STATUS_COLUMN};
pub use summary::DatasetSummary;
pub use table::{CellValue, Dataset, Record};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_plain_variant() {
        let json = serde_json::to_string(&MatchStatus::Conferido).expect("serialize status");
        assert_eq!(json, "\"Conferido\"");
        let round: MatchStatus = serde_json::from_str(&json).expect("deserialize status");
        assert_eq!(round, MatchStatus::Conferido);
    }

    #[test]
    fn dataset_round_trips_through_json() {
        let mut dataset = Dataset::new("extrato", vec!["data".to_string(), "valor".to_string()]);
        dataset.push_row(Record::from_iter([
            (
                "data".to_string(),
                CellValue::Text("2025-01-01".to_string()),
            ),
            ("valor".to_string(), CellValue::Missing),
        ]));
        let json = serde_json::to_string(&dataset).expect("serialize dataset");
        let round: Dataset = serde_json::from_str(&json).expect("deserialize dataset");
        assert_eq!(round, dataset);
    }
}
