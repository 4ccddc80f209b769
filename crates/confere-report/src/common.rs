//! Shared export configuration.

/// Which cells receive the status background fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Paint the whole row (how the reviewed spreadsheet is usually read).
    #[default]
    EntireRow,
    /// Paint only the named columns plus the status column.
    KeyColumns(Vec<String>),
}

/// Export configuration shared by the spreadsheet writers.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Worksheet name for the primary dataset.
    pub sheet_name: String,
    pub color_policy: ColorPolicy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Conferência".to_string(),
            color_policy: ColorPolicy::default(),
        }
    }
}

impl ColorPolicy {
    /// Whether a given column should be painted under this policy.
    #[must_use]
    pub fn paints(&self, column: &str) -> bool {
        match self {
            ColorPolicy::EntireRow => true,
            ColorPolicy::KeyColumns(columns) => {
                column == confere_model::STATUS_COLUMN
                    || columns.iter().any(|candidate| candidate == column)
            }
        }
    }
}
