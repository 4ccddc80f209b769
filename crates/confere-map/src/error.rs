use confere_model::CanonicalField;
use thiserror::Error;

/// Errors raised during column normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Two source columns both normalize to the same canonical field.
    /// Renaming either would silently shadow the other, so this is
    /// rejected outright.
    #[error(
        "ambiguous mapping in '{dataset}': columns '{first}' and '{second}' both normalize to '{field}'"
    )]
    AmbiguousMapping {
        dataset: String,
        field: CanonicalField,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, MapError>;
