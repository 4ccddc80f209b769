use serde::{Deserialize, Serialize};

use crate::status::MatchStatus;

/// Aggregate counts over a reconciled dataset, for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub name: String,
    pub total: usize,
    pub conferido: usize,
    pub erro: usize,
}

impl DatasetSummary {
    pub fn from_statuses(name: impl Into<String>, statuses: &[MatchStatus]) -> Self {
        let conferido = statuses.iter().filter(|status| status.is_matched()).count();
        Self {
            name: name.into(),
            total: statuses.len(),
            conferido,
            erro: statuses.len() - conferido,
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.erro > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_statuses() {
        let statuses = [
            MatchStatus::Conferido,
            MatchStatus::Erro,
            MatchStatus::Conferido,
        ];
        let summary = DatasetSummary::from_statuses("extrato", &statuses);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.conferido, 2);
        assert_eq!(summary.erro, 1);
        assert!(summary.has_errors());
    }

    #[test]
    fn empty_dataset_has_no_errors() {
        let summary = DatasetSummary::from_statuses("pagseguro", &[]);
        assert_eq!(summary.total, 0);
        assert!(!summary.has_errors());
    }
}
