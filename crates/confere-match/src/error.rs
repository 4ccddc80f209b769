//! Error types for the reconciliation matcher.

use confere_model::CanonicalField;
use thiserror::Error;

/// Errors raised before or during matching.
///
/// Schema problems are detected before any row is processed; no partial
/// status output ever accompanies one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A key field set must name at least one canonical field.
    #[error("key field set is empty")]
    EmptyKeySet,

    /// The same field was named twice in a key field set.
    #[error("duplicate key field: {0}")]
    DuplicateKeyField(CanonicalField),

    /// A key field name did not parse as a canonical field.
    #[error("unknown key field: '{0}' (expected one of: codigo_nsu, autorizacao, codigo_venda, data, valor, loja)")]
    UnknownKeyField(String),

    /// A dataset lacks one or more key columns after normalization.
    #[error("dataset '{dataset}' is missing required key column(s): {}", join_fields(.fields))]
    MissingKeyFields {
        dataset: String,
        fields: Vec<CanonicalField>,
    },

    /// A non-empty key value could not be canonicalized to its field's
    /// type (e.g. free text where a date is required).
    #[error("dataset '{dataset}', row {row}: value '{value}' is not comparable as {} '{field}'", kind_name(.field))]
    NotComparable {
        dataset: String,
        /// 1-based data row number.
        row: usize,
        field: CanonicalField,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, MatchError>;

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn kind_name(field: &CanonicalField) -> &'static str {
    match field.kind() {
        confere_model::FieldKind::Text => "text field",
        confere_model::FieldKind::Amount => "amount field",
        confere_model::FieldKind::Date => "date field",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_names_every_field() {
        let error = MatchError::MissingKeyFields {
            dataset: "extrato".to_string(),
            fields: vec![CanonicalField::Valor, CanonicalField::Loja],
        };
        insta::assert_snapshot!(
            error.to_string(),
            @"dataset 'extrato' is missing required key column(s): valor, loja"
        );
    }

    #[test]
    fn not_comparable_message_names_row_and_kind() {
        let error = MatchError::NotComparable {
            dataset: "pagseguro".to_string(),
            row: 3,
            field: CanonicalField::Data,
            value: "primeiro de janeiro".to_string(),
        };
        insta::assert_snapshot!(
            error.to_string(),
            @"dataset 'pagseguro', row 3: value 'primeiro de janeiro' is not comparable as date field 'data'"
        );
    }
}
