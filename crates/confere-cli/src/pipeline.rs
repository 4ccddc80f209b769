//! Reconciliation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the ledger and settlement files into datasets
//! 2. **Normalize**: rename columns onto the canonical field set
//! 3. **Reconcile**: match ledger records against settlement records
//! 4. **Export**: write the annotated spreadsheet(s)
//!
//! Each stage takes the output of the previous stage and returns typed
//! results.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, trace};

use confere_ingest::{IngestOptions, dataset_name_from_path, read_table};
use confere_map::{AliasTable, Normalized, normalize_columns};
use confere_match::{KeyFieldSet, MatchOptions, Reconciliation, reconcile};
use confere_model::{CellValue, Dataset};
use confere_report::{ExportOptions, write_csv, write_xlsx_many};

use crate::logging::redact_value;

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage: the ledger plus the settlement datasets,
/// in the order they were given on the command line.
#[derive(Debug)]
pub struct LoadedInputs {
    pub extrato: Dataset,
    pub settlements: Vec<Dataset>,
}

/// Read the ledger and every settlement file.
pub fn load_inputs(
    extrato_path: &Path,
    settlement_paths: &[PathBuf],
    options: &IngestOptions,
) -> Result<LoadedInputs> {
    let ingest_span = info_span!("ingest", extrato = %extrato_path.display());
    let _ingest_guard = ingest_span.enter();
    let ingest_start = Instant::now();

    let extrato = read_table(extrato_path, "extrato", options)
        .with_context(|| format!("read ledger {}", extrato_path.display()))?;

    let mut settlements = Vec::with_capacity(settlement_paths.len());
    for path in settlement_paths {
        let name = dataset_name_from_path(path);
        let dataset = read_table(path, &name, options)
            .with_context(|| format!("read settlement {}", path.display()))?;
        settlements.push(dataset);
    }

    info!(
        extrato_rows = extrato.height(),
        settlement_count = settlements.len(),
        settlement_rows = settlements.iter().map(Dataset::height).sum::<usize>(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(LoadedInputs {
        extrato,
        settlements,
    })
}

// ============================================================================
// Stage 2: Normalize
// ============================================================================

/// Result of the normalize stage.
#[derive(Debug)]
pub struct NormalizedInputs {
    pub extrato: Normalized,
    pub settlements: Vec<Normalized>,
}

/// Normalize column labels on every dataset using the given alias table.
pub fn normalize_inputs(inputs: &LoadedInputs, aliases: &AliasTable) -> Result<NormalizedInputs> {
    let normalize_span = info_span!("normalize");
    let _normalize_guard = normalize_span.enter();
    let normalize_start = Instant::now();

    let extrato = normalize_columns(&inputs.extrato, aliases)
        .with_context(|| format!("normalize columns of '{}'", inputs.extrato.name))?;
    debug!(
        dataset = %extrato.dataset.name,
        mapped = extrato.report.mapped.len(),
        passthrough = extrato.report.passthrough.len(),
        "columns normalized"
    );

    let mut settlements = Vec::with_capacity(inputs.settlements.len());
    for dataset in &inputs.settlements {
        let normalized = normalize_columns(dataset, aliases)
            .with_context(|| format!("normalize columns of '{}'", dataset.name))?;
        debug!(
            dataset = %normalized.dataset.name,
            mapped = normalized.report.mapped.len(),
            passthrough = normalized.report.passthrough.len(),
            "columns normalized"
        );
        settlements.push(normalized);
    }

    info!(
        dataset_count = 1 + settlements.len(),
        duration_ms = normalize_start.elapsed().as_millis(),
        "normalize complete"
    );
    Ok(NormalizedInputs {
        extrato,
        settlements,
    })
}

/// Key-column presence per dataset, for the pre-match display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCheck {
    pub dataset: String,
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

/// Check which key columns each normalized dataset exposes.
pub fn column_checks(inputs: &NormalizedInputs, key: &KeyFieldSet) -> Vec<ColumnCheck> {
    let mut checks = Vec::with_capacity(1 + inputs.settlements.len());
    checks.push(check_dataset(&inputs.extrato.dataset, key));
    for normalized in &inputs.settlements {
        checks.push(check_dataset(&normalized.dataset, key));
    }
    checks
}

fn check_dataset(dataset: &Dataset, key: &KeyFieldSet) -> ColumnCheck {
    let mut found = Vec::new();
    let mut missing = Vec::new();
    for field in key.fields() {
        if dataset.has_column(field.as_str()) {
            found.push(field.as_str().to_string());
        } else {
            missing.push(field.as_str().to_string());
        }
    }
    ColumnCheck {
        dataset: dataset.name.clone(),
        found,
        missing,
    }
}

// ============================================================================
// Stage 3: Reconcile
// ============================================================================

/// Match the ledger against the settlements.
pub fn run_match(inputs: &NormalizedInputs, options: &MatchOptions) -> Result<Reconciliation> {
    let match_span = info_span!("reconcile", key = %options.key);
    let _match_guard = match_span.enter();
    let match_start = Instant::now();

    let settlements: Vec<Dataset> = inputs
        .settlements
        .iter()
        .map(|normalized| normalized.dataset.clone())
        .collect();
    let result = reconcile(&inputs.extrato.dataset, &settlements, options)?;

    for (idx, (record, status)) in result
        .primary
        .dataset
        .rows
        .iter()
        .zip(&result.primary.statuses)
        .enumerate()
    {
        if !status.is_matched() {
            let rendered: Vec<String> = options
                .key
                .fields()
                .iter()
                .map(|field| {
                    record
                        .get(field.as_str())
                        .unwrap_or(&CellValue::Missing)
                        .render()
                })
                .collect();
            trace!(
                row = idx + 1,
                key_values = %redact_value(&rendered.join(" | ")),
                "unmatched ledger row"
            );
        }
    }

    let summary = result.primary.summary();
    info!(
        total = summary.total,
        conferido = summary.conferido,
        erro = summary.erro,
        duration_ms = match_start.elapsed().as_millis(),
        "reconcile complete"
    );
    Ok(result)
}

// ============================================================================
// Stage 4: Export
// ============================================================================

/// Output formats the CLI can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Both,
}

/// Where and how to write the annotated result.
#[derive(Debug)]
pub struct ExportPlan {
    /// Primary output path; sibling paths are derived from it.
    pub output: PathBuf,
    pub format: ExportFormat,
    pub options: ExportOptions,
    pub dry_run: bool,
}

/// Result of the export stage.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    pub written: Vec<PathBuf>,
    /// Non-fatal per-file failures.
    pub errors: Vec<String>,
}

/// Write the annotated dataset(s) per the plan.
///
/// In bidirectional mode the Excel workbook carries one extra worksheet per
/// settlement; CSV output writes one extra file per settlement instead.
pub fn export(reconciliation: &Reconciliation, plan: &ExportPlan) -> ExportOutcome {
    let export_span = info_span!("export", output = %plan.output.display());
    let _export_guard = export_span.enter();
    let export_start = Instant::now();
    let mut outcome = ExportOutcome::default();

    if plan.dry_run {
        info!("export skipped (dry run)");
        return outcome;
    }

    let want_xlsx = matches!(plan.format, ExportFormat::Xlsx | ExportFormat::Both);
    let want_csv = matches!(plan.format, ExportFormat::Csv | ExportFormat::Both);

    if want_xlsx {
        let path = plan.output.with_extension("xlsx");
        let mut sheets = vec![reconciliation.primary.clone()];
        sheets.extend(reconciliation.comparisons.iter().cloned());
        match write_xlsx_many(&path, &sheets, &plan.options) {
            Ok(()) => outcome.written.push(path),
            Err(error) => outcome.errors.push(format!("xlsx: {error:#}")),
        }
    }

    if want_csv {
        let path = plan.output.with_extension("csv");
        match write_csv(&path, &reconciliation.primary) {
            Ok(()) => outcome.written.push(path.clone()),
            Err(error) => outcome.errors.push(format!("csv: {error:#}")),
        }
        for comparison in &reconciliation.comparisons {
            let stem = path
                .file_stem()
                .and_then(|value| value.to_str())
                .unwrap_or("resultado");
            let sibling = path.with_file_name(format!(
                "{stem}_{name}.csv",
                name = comparison.dataset.name
            ));
            match write_csv(&sibling, comparison) {
                Ok(()) => outcome.written.push(sibling),
                Err(error) => outcome
                    .errors
                    .push(format!("csv {}: {error:#}", comparison.dataset.name)),
            }
        }
    }

    info!(
        file_count = outcome.written.len(),
        error_count = outcome.errors.len(),
        duration_ms = export_start.elapsed().as_millis(),
        "export complete"
    );
    outcome
}
