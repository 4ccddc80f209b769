//! Reconciliation engine.
//!
//! Matching is existential: a primary record is `Conferido` when at least
//! one record in any comparison dataset equals it on every key field, and
//! `Erro` otherwise. All schema preconditions are checked before the first
//! row is touched.

use std::collections::HashSet;

use tracing::debug;

use confere_model::{
    CellValue, Dataset, DatasetSummary, MatchStatus, STATUS_COLUMN,
};

use crate::error::{MatchError, Result};
use crate::index::{KeyIndex, KeyTuple, key_tuple};
use crate::key::KeyFieldSet;
use crate::value::ParseOptions;

/// How comparison-side statuses are derived in a bidirectional run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PropagationPolicy {
    /// A comparison record is `Conferido` when any primary record shares
    /// its key tuple.
    #[default]
    Independent,
    /// Stricter: only primary records already marked `Conferido` count.
    /// Explicit opt-in; under-reports comparison-side matches whose
    /// primary counterpart was excluded for other reasons.
    ConfirmedOnly,
}

/// Configuration for one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    pub key: KeyFieldSet,
    /// Also compute comparison→primary statuses.
    pub bidirectional: bool,
    pub propagation: PropagationPolicy,
    pub parse: ParseOptions,
}

/// A dataset plus the matcher's verdict for each of its records.
///
/// Rows are never added, removed, or reordered; `statuses` is parallel to
/// `dataset.rows` and owned exclusively by the matcher.
#[derive(Debug, Clone)]
pub struct ReconciledDataset {
    pub dataset: Dataset,
    pub statuses: Vec<MatchStatus>,
}

impl ReconciledDataset {
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::from_statuses(self.dataset.name.clone(), &self.statuses)
    }

    /// The dataset with a `status` column appended, for export surfaces.
    #[must_use]
    pub fn annotated(&self) -> Dataset {
        let mut dataset = self.dataset.clone();
        if !dataset.has_column(STATUS_COLUMN) {
            dataset.columns.push(STATUS_COLUMN.to_string());
        }
        for (record, status) in dataset.rows.iter_mut().zip(&self.statuses) {
            record.insert(STATUS_COLUMN, CellValue::Text(status.as_str().to_string()));
        }
        dataset
    }
}

/// Output of [`reconcile`]: the annotated primary dataset, and the
/// annotated comparison datasets when bidirectional mode was requested
/// (empty otherwise).
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub primary: ReconciledDataset,
    pub comparisons: Vec<ReconciledDataset>,
}

/// Match a primary dataset against one or more comparison datasets.
///
/// Comparison datasets are consulted in caller order and the search
/// short-circuits on the first hit. Each comparison dataset is indexed by
/// key tuple once, so the whole run is O(primary + Σ comparison).
pub fn reconcile(
    primary: &Dataset,
    comparisons: &[Dataset],
    options: &MatchOptions,
) -> Result<Reconciliation> {
    check_key_columns(primary, &options.key)?;
    for dataset in comparisons {
        check_key_columns(dataset, &options.key)?;
    }

    let mut indexes = Vec::with_capacity(comparisons.len());
    for dataset in comparisons {
        let index = KeyIndex::build(dataset, &options.key, &options.parse)?;
        debug!(
            dataset = %dataset.name,
            distinct_keys = index.len(),
            row_count = dataset.height(),
            "comparison dataset indexed"
        );
        indexes.push(index);
    }

    let mut statuses = Vec::with_capacity(primary.height());
    let mut primary_tuples: Vec<Option<KeyTuple>> = Vec::with_capacity(primary.height());
    for (idx, record) in primary.rows.iter().enumerate() {
        let tuple = key_tuple(&primary.name, idx + 1, record, &options.key, &options.parse)?;
        let status = match &tuple {
            Some(tuple) if indexes.iter().any(|index| index.contains(tuple)) => {
                MatchStatus::Conferido
            }
            // Incomplete keys can match nothing.
            _ => MatchStatus::Erro,
        };
        statuses.push(status);
        primary_tuples.push(tuple);
    }
    let matched = statuses.iter().filter(|status| status.is_matched()).count();
    debug!(
        dataset = %primary.name,
        row_count = primary.height(),
        conferido = matched,
        erro = primary.height() - matched,
        "primary dataset matched"
    );

    let comparisons_out = if options.bidirectional {
        let needles: HashSet<&KeyTuple> = primary_tuples
            .iter()
            .zip(&statuses)
            .filter(|(_, status)| match options.propagation {
                PropagationPolicy::Independent => true,
                PropagationPolicy::ConfirmedOnly => status.is_matched(),
            })
            .filter_map(|(tuple, _)| tuple.as_ref())
            .collect();
        let mut annotated = Vec::with_capacity(comparisons.len());
        for dataset in comparisons {
            let mut comparison_statuses = Vec::with_capacity(dataset.height());
            for (idx, record) in dataset.rows.iter().enumerate() {
                let tuple =
                    key_tuple(&dataset.name, idx + 1, record, &options.key, &options.parse)?;
                let status = match tuple {
                    Some(tuple) if needles.contains(&tuple) => MatchStatus::Conferido,
                    _ => MatchStatus::Erro,
                };
                comparison_statuses.push(status);
            }
            annotated.push(ReconciledDataset {
                dataset: dataset.clone(),
                statuses: comparison_statuses,
            });
        }
        annotated
    } else {
        Vec::new()
    };

    Ok(Reconciliation {
        primary: ReconciledDataset {
            dataset: primary.clone(),
            statuses,
        },
        comparisons: comparisons_out,
    })
}

fn check_key_columns(dataset: &Dataset, key: &KeyFieldSet) -> Result<()> {
    let missing: Vec<_> = key
        .fields()
        .iter()
        .copied()
        .filter(|field| !dataset.has_column(field.as_str()))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MatchError::MissingKeyFields {
            dataset: dataset.name.clone(),
            fields: missing,
        })
    }
}
