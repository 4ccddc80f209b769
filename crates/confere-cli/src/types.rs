use std::path::PathBuf;

use confere_model::DatasetSummary;

use confere_cli::pipeline::ColumnCheck;

/// Everything the summary printer needs after a reconcile run.
#[derive(Debug)]
pub struct ReconcileResult {
    /// Primary dataset summary first, then settlements (bidirectional only).
    pub summaries: Vec<DatasetSummary>,
    pub column_checks: Vec<ColumnCheck>,
    pub written: Vec<PathBuf>,
    /// Non-fatal failures collected along the way.
    pub errors: Vec<String>,
    /// True when any ledger row is unmatched.
    pub has_unmatched: bool,
}
