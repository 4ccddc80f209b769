use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A canonical logical column name that raw source labels alias to.
///
/// Declaration order is load-bearing: alias resolution walks the fields in
/// this order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    CodigoNsu,
    Autorizacao,
    CodigoVenda,
    Data,
    Valor,
    Loja,
}

/// How values of a canonical field are canonicalized before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Amount,
    Date,
}

impl CanonicalField {
    /// All canonical fields in alias-resolution order.
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::CodigoNsu,
        CanonicalField::Autorizacao,
        CanonicalField::CodigoVenda,
        CanonicalField::Data,
        CanonicalField::Valor,
        CanonicalField::Loja,
    ];

    /// The canonical column label used after normalization.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::CodigoNsu => "codigo_nsu",
            CanonicalField::Autorizacao => "autorizacao",
            CanonicalField::CodigoVenda => "codigo_venda",
            CanonicalField::Data => "data",
            CanonicalField::Valor => "valor",
            CanonicalField::Loja => "loja",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            CanonicalField::Data => FieldKind::Date,
            CanonicalField::Valor => FieldKind::Amount,
            CanonicalField::CodigoNsu
            | CanonicalField::Autorizacao
            | CanonicalField::CodigoVenda
            | CanonicalField::Loja => FieldKind::Text,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized canonical field name (e.g. from `--key`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown canonical field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for CanonicalField {
    type Err = UnknownFieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_lowercase();
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.as_str() == needle)
            .ok_or_else(|| UnknownFieldError(raw.trim().to_string()))
    }
}
