//! Key field sets: which canonical fields define a match.

use std::fmt;

use serde::{Deserialize, Serialize};

use confere_model::CanonicalField;

use crate::error::{MatchError, Result};

/// Non-empty ordered set of canonical fields compared for equality.
///
/// Two records match when they are equal on every field in the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFieldSet {
    fields: Vec<CanonicalField>,
}

impl KeyFieldSet {
    /// Build a key set; rejects empty sets and duplicate fields.
    pub fn new(fields: impl IntoIterator<Item = CanonicalField>) -> Result<Self> {
        let mut collected = Vec::new();
        for field in fields {
            if collected.contains(&field) {
                return Err(MatchError::DuplicateKeyField(field));
            }
            collected.push(field);
        }
        if collected.is_empty() {
            return Err(MatchError::EmptyKeySet);
        }
        Ok(Self { fields: collected })
    }

    /// Parse a comma-separated field list, e.g. `"data,valor,loja"`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut fields = Vec::new();
        for part in text.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let field: CanonicalField = part
                .parse()
                .map_err(|_| MatchError::UnknownKeyField(part.to_string()))?;
            fields.push(field);
        }
        Self::new(fields)
    }

    #[must_use]
    pub fn fields(&self) -> &[CanonicalField] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for KeyFieldSet {
    /// The composite key used by the reconciliation flow: date, amount, store.
    fn default() -> Self {
        Self {
            fields: vec![
                CanonicalField::Data,
                CanonicalField::Valor,
                CanonicalField::Loja,
            ],
        }
    }
}

impl fmt::Display for KeyFieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(|field| field.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_key_is_data_valor_loja() {
        assert_eq!(KeyFieldSet::default().to_string(), "data,valor,loja");
    }

    #[test]
    fn parse_accepts_spaces_and_case() {
        let key = KeyFieldSet::parse(" Data , VALOR ,loja ").unwrap();
        assert_eq!(key, KeyFieldSet::default());
    }

    #[test]
    fn parse_rejects_unknown_field() {
        let error = KeyFieldSet::parse("data,amount").unwrap_err();
        assert_eq!(error, MatchError::UnknownKeyField("amount".to_string()));
    }

    #[test]
    fn empty_and_duplicate_sets_are_rejected() {
        assert_eq!(KeyFieldSet::parse("").unwrap_err(), MatchError::EmptyKeySet);
        assert_eq!(
            KeyFieldSet::parse("valor,valor").unwrap_err(),
            MatchError::DuplicateKeyField(CanonicalField::Valor)
        );
    }
}
