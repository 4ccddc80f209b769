//! Property tests for the matching engine.

use std::collections::HashSet;

use proptest::prelude::*;

use confere_match::{MatchOptions, reconcile};
use confere_model::{CellValue, Dataset, MatchStatus, Record};

const DATES: [&str; 3] = ["2025-01-01", "2025-01-02", "2025-01-03"];
const AMOUNTS: [&str; 3] = ["10.00", "99.90", "150.50"];
const STORES: [&str; 3] = ["Loja 1", "Loja 2", "Loja 3"];

/// One row as (date index, amount index, store index) into the pools above.
/// Small pools force key collisions between primary and comparisons.
fn row_strategy() -> impl Strategy<Value = (usize, usize, usize)> {
    (0..DATES.len(), 0..AMOUNTS.len(), 0..STORES.len())
}

fn dataset_from(name: &str, rows: &[(usize, usize, usize)]) -> Dataset {
    let mut dataset = Dataset::new(
        name,
        vec!["data".to_string(), "valor".to_string(), "loja".to_string()],
    );
    for (date, amount, store) in rows {
        let record: Record = [
            ("data", DATES[*date]),
            ("valor", AMOUNTS[*amount]),
            ("loja", STORES[*store]),
        ]
        .into_iter()
        .map(|(column, value)| (column.to_string(), CellValue::Text(value.to_string())))
        .collect();
        dataset.push_row(record);
    }
    dataset
}

proptest! {
    /// Existence property over the full default key set: a primary record
    /// is Conferido exactly when its key tuple occurs in some comparison
    /// dataset.
    #[test]
    fn status_is_membership_in_comparison_keys(
        primary_rows in prop::collection::vec(row_strategy(), 0..20),
        first_rows in prop::collection::vec(row_strategy(), 0..20),
        second_rows in prop::collection::vec(row_strategy(), 0..20),
    ) {
        let primary = dataset_from("extrato", &primary_rows);
        let comparisons = vec![
            dataset_from("pagseguro", &first_rows),
            dataset_from("rede", &second_rows),
        ];
        let result = reconcile(&primary, &comparisons, &MatchOptions::default()).unwrap();

        let known: HashSet<&(usize, usize, usize)> =
            first_rows.iter().chain(second_rows.iter()).collect();
        for (row, status) in primary_rows.iter().zip(&result.primary.statuses) {
            let expected = if known.contains(row) {
                MatchStatus::Conferido
            } else {
                MatchStatus::Erro
            };
            prop_assert_eq!(*status, expected);
        }
    }

    /// Bidirectional symmetry: a key tuple present on both sides reports
    /// Conferido on both sides.
    #[test]
    fn shared_tuples_are_conferido_on_both_sides(
        shared in row_strategy(),
        primary_extra in prop::collection::vec(row_strategy(), 0..10),
        comparison_extra in prop::collection::vec(row_strategy(), 0..10),
    ) {
        let mut primary_rows = vec![shared];
        primary_rows.extend(primary_extra);
        let mut comparison_rows = vec![shared];
        comparison_rows.extend(comparison_extra);

        let primary = dataset_from("extrato", &primary_rows);
        let comparison = dataset_from("pagseguro", &comparison_rows);
        let options = MatchOptions { bidirectional: true, ..MatchOptions::default() };
        let result = reconcile(&primary, &[comparison], &options).unwrap();

        prop_assert_eq!(result.primary.statuses[0], MatchStatus::Conferido);
        prop_assert_eq!(result.comparisons[0].statuses[0], MatchStatus::Conferido);
    }
}
