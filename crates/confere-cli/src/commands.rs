use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info_span;

use confere_cli::pipeline::{
    ExportFormat, ExportPlan, column_checks, export, load_inputs, normalize_inputs, run_match,
};
use confere_ingest::IngestOptions;
use confere_map::AliasTable;
use confere_match::{KeyFieldSet, MatchOptions, PropagationPolicy};
use confere_model::CanonicalField;
use confere_report::{ColorPolicy, ExportOptions};

use crate::cli::{ColorFillArg, OutputFormatArg, ReconcileArgs};
use crate::summary::apply_table_style;
use crate::types::ReconcileResult;

pub fn run_fields() -> Result<()> {
    let aliases = AliasTable::default_ptbr();
    let mut table = Table::new();
    table.set_header(vec!["Field", "Recognized column labels"]);
    apply_table_style(&mut table);
    for field in CanonicalField::ALL {
        table.add_row(vec![
            field.as_str().to_string(),
            aliases.aliases_for(field).join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_reconcile(args: &ReconcileArgs) -> Result<ReconcileResult> {
    let run_span = info_span!("reconcile_run", extrato = %args.extrato.display());
    let _run_guard = run_span.enter();

    let key = KeyFieldSet::parse(&args.key).context("parse --key")?;
    let match_options = MatchOptions {
        key: key.clone(),
        bidirectional: args.bidirectional || args.confirmed_only,
        propagation: if args.confirmed_only {
            PropagationPolicy::ConfirmedOnly
        } else {
            PropagationPolicy::Independent
        },
        ..MatchOptions::default()
    };
    let ingest_options = IngestOptions {
        delimiter: args.delimiter.map(|delimiter| delimiter as u8),
        sheet: args.sheet.clone(),
    };

    let inputs = load_inputs(&args.extrato, &args.against, &ingest_options)?;
    let normalized = normalize_inputs(&inputs, &AliasTable::default_ptbr())?;
    let checks = column_checks(&normalized, &key);

    let reconciliation = run_match(&normalized, &match_options)?;

    let output = args.output.clone().unwrap_or_else(|| {
        args.extrato
            .parent()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_default()
            .join("extrato_conferido.xlsx")
    });
    let color_policy = match args.fill {
        ColorFillArg::Row => ColorPolicy::EntireRow,
        ColorFillArg::KeyColumns => ColorPolicy::KeyColumns(
            key.fields()
                .iter()
                .map(|field| field.as_str().to_string())
                .collect(),
        ),
    };
    let plan = ExportPlan {
        output,
        format: match args.format {
            OutputFormatArg::Xlsx => ExportFormat::Xlsx,
            OutputFormatArg::Csv => ExportFormat::Csv,
            OutputFormatArg::Both => ExportFormat::Both,
        },
        options: ExportOptions {
            color_policy,
            ..ExportOptions::default()
        },
        dry_run: args.dry_run,
    };
    let outcome = export(&reconciliation, &plan);

    let mut summaries = vec![reconciliation.primary.summary()];
    for comparison in &reconciliation.comparisons {
        summaries.push(comparison.summary());
    }
    let has_unmatched = reconciliation
        .primary
        .statuses
        .iter()
        .any(|status| !status.is_matched());

    Ok(ReconcileResult {
        summaries,
        column_checks: checks,
        written: outcome.written,
        errors: outcome.errors,
        has_unmatched,
    })
}
