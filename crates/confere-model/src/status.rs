use std::fmt;

use serde::{Deserialize, Serialize};

/// Column label under which the matcher's verdict is exported.
pub const STATUS_COLUMN: &str = "status";

/// Per-record reconciliation verdict. Written only by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// At least one comparison record matched on every key field.
    Conferido,
    /// No comparison record matched.
    Erro,
}

impl MatchStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Conferido => "Conferido",
            MatchStatus::Erro => "Erro",
        }
    }

    #[must_use]
    pub fn is_matched(self) -> bool {
        matches!(self, MatchStatus::Conferido)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_match_export_values() {
        assert_eq!(MatchStatus::Conferido.as_str(), "Conferido");
        assert_eq!(MatchStatus::Erro.as_str(), "Erro");
        assert!(MatchStatus::Conferido.is_matched());
        assert!(!MatchStatus::Erro.is_matched());
    }
}
