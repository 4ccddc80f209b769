//! Color-annotated Excel output.
//!
//! Each reconciled dataset becomes one worksheet: bold header row, then
//! one row per record with the status column appended. Matched rows are
//! filled green, unmatched rows red, so a reviewer can scan the sheet
//! without reading the status text.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};
use tracing::debug;

use confere_match::ReconciledDataset;
use confere_model::{CellValue, MatchStatus};

use crate::common::{ColorPolicy, ExportOptions};

/// Fill for matched rows.
const CONFERIDO_FILL: Color = Color::RGB(0x00C6_EFCE);
/// Fill for unmatched rows.
const ERRO_FILL: Color = Color::RGB(0x00FF_C7CE);

/// Worksheet names are capped at 31 characters by the format.
const MAX_SHEET_NAME: usize = 31;

/// Write one reconciled dataset to an Excel file.
pub fn write_xlsx(
    path: &Path,
    reconciled: &ReconciledDataset,
    options: &ExportOptions,
) -> Result<()> {
    write_xlsx_many(path, std::slice::from_ref(reconciled), options)
}

/// Write several reconciled datasets into one workbook, one worksheet
/// each. The first worksheet takes `options.sheet_name`; the rest are
/// named after their dataset.
pub fn write_xlsx_many(
    path: &Path,
    datasets: &[ReconciledDataset],
    options: &ExportOptions,
) -> Result<()> {
    let mut workbook = Workbook::new();
    for (idx, reconciled) in datasets.iter().enumerate() {
        let sheet_name = if idx == 0 {
            options.sheet_name.clone()
        } else {
            reconciled.dataset.name.clone()
        };
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(truncate_sheet_name(&sheet_name))
            .with_context(|| format!("name worksheet '{sheet_name}'"))?;
        write_sheet(worksheet, reconciled, &options.color_policy)
            .with_context(|| format!("write worksheet '{sheet_name}'"))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    debug!(
        path = %path.display(),
        sheet_count = datasets.len(),
        "workbook written"
    );
    Ok(())
}

fn write_sheet(
    worksheet: &mut Worksheet,
    reconciled: &ReconciledDataset,
    policy: &ColorPolicy,
) -> Result<()> {
    let annotated = reconciled.annotated();
    let header_format = Format::new().set_bold();
    for (col, label) in annotated.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, label, &header_format)?;
    }

    let conferido = Format::new().set_background_color(CONFERIDO_FILL);
    let erro = Format::new().set_background_color(ERRO_FILL);
    for (row_idx, (record, status)) in annotated
        .rows
        .iter()
        .zip(&reconciled.statuses)
        .enumerate()
    {
        let fill = match status {
            MatchStatus::Conferido => &conferido,
            MatchStatus::Erro => &erro,
        };
        let row = (row_idx + 1) as u32;
        for (col_idx, column) in annotated.columns.iter().enumerate() {
            let col = col_idx as u16;
            let cell = record.get(column).unwrap_or(&CellValue::Missing);
            let format = if policy.paints(column) { Some(fill) } else { None };
            write_cell(worksheet, row, col, cell, format)?;
        }
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    format: Option<&Format>,
) -> Result<()> {
    match (cell, format) {
        (CellValue::Number(number), Some(format)) => {
            let value = number.to_f64().unwrap_or_default();
            worksheet.write_number_with_format(row, col, value, format)?;
        }
        (CellValue::Number(number), None) => {
            let value = number.to_f64().unwrap_or_default();
            worksheet.write_number(row, col, value)?;
        }
        (other, Some(format)) => {
            worksheet.write_string_with_format(row, col, other.render(), format)?;
        }
        (other, None) => {
            worksheet.write_string(row, col, other.render())?;
        }
    }
    Ok(())
}

fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME).collect()
}
