//! Header cleanup and header-row detection.
//!
//! Settlement exports often carry preamble rows (merchant name, period,
//! totals) above the real header. Detection scores the first few rows and
//! picks the best header candidate before data begins.

/// Trim, strip a UTF-8 BOM, and collapse internal whitespace runs.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Trim a data cell and strip a stray BOM.
pub fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Make duplicate header labels unique by suffixing " (2)", " (3)", ...
///
/// Record cells are keyed by label, so duplicates would silently collide.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        if !seen.iter().any(|existing| existing == &header) {
            seen.push(header);
            continue;
        }
        let mut attempt = 2usize;
        loop {
            let candidate = format!("{header} ({attempt})");
            if !seen.iter().any(|existing| existing == &candidate) {
                seen.push(candidate);
                break;
            }
            attempt += 1;
        }
    }
    seen
}

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    total: usize,
    non_empty: usize,
    numeric: usize,
    alpha: usize,
}

impl RowStats {
    fn non_empty_ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.non_empty as f64 / self.total as f64
        }
    }

    fn numeric_ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.numeric as f64 / self.total as f64
        }
    }

    fn alpha_ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.alpha as f64 / self.total as f64
        }
    }
}

fn row_stats(row: &[String]) -> RowStats {
    let mut stats = RowStats {
        total: row.len(),
        ..RowStats::default()
    };
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if trimmed.replace(',', ".").parse::<f64>().is_ok() {
            stats.numeric += 1;
        }
        if trimmed.chars().any(|ch| ch.is_alphabetic()) {
            stats.alpha += 1;
        }
    }
    stats
}

fn is_data_like(stats: RowStats) -> bool {
    // Data rows carry amounts or date serials; preamble text does not.
    stats.numeric_ratio() >= 0.2
}

fn is_header_like(stats: RowStats) -> bool {
    stats.non_empty_ratio() >= 0.8 && stats.alpha_ratio() >= 0.5 && stats.numeric_ratio() <= 0.1
}

/// Index of the most plausible header row.
///
/// Heuristic: the last header-like row before data starts; when no row
/// scores as header-like, the fullest row in the window wins.
pub fn detect_header_row(rows: &[Vec<String>]) -> usize {
    if rows.is_empty() {
        return 0;
    }
    let probe = rows.len().min(5);
    let stats: Vec<RowStats> = rows.iter().take(probe).map(|row| row_stats(row)).collect();
    let mut data_index = None;
    for (idx, stat) in stats.iter().enumerate() {
        if is_data_like(*stat) {
            data_index = Some(idx);
            break;
        }
    }
    // Without a detectable data row, assume the table starts at the top.
    let search_end = data_index.unwrap_or(1).max(1);
    let mut candidate = None;
    for (idx, stat) in stats.iter().enumerate().take(search_end) {
        if is_header_like(*stat) {
            candidate = Some(idx);
        }
    }
    candidate.unwrap_or_else(|| {
        let mut best = 0usize;
        for (idx, stat) in stats.iter().enumerate().take(search_end) {
            if stat.non_empty > stats[best].non_empty {
                best = idx;
            }
        }
        best
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn normalize_header_collapses_whitespace_and_bom() {
        assert_eq!(normalize_header("\u{feff}  Valor   Bruto "), "Valor Bruto");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn dedupe_headers_suffixes_duplicates() {
        let headers = dedupe_headers(vec![
            "data".to_string(),
            "valor".to_string(),
            "data".to_string(),
        ]);
        assert_eq!(headers, vec!["data", "valor", "data (2)"]);
    }

    #[test]
    fn header_on_first_row() {
        let rows = vec![
            row(&["Data", "Valor", "Loja"]),
            row(&["2025-01-01", "100.00", "Loja 1"]),
        ];
        assert_eq!(detect_header_row(&rows), 0);
    }

    #[test]
    fn header_after_preamble_rows() {
        let rows = vec![
            row(&["Relatório de vendas", "", ""]),
            row(&["Período: janeiro", "", ""]),
            row(&["Data", "Valor", "Loja"]),
            row(&["02/01/2025", "59,90", "Loja 2"]),
        ];
        assert_eq!(detect_header_row(&rows), 2);
    }
}
