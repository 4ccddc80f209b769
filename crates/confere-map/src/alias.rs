//! Alias table: which raw labels resolve to which canonical field.

use std::collections::BTreeMap;

use confere_model::CanonicalField;

/// Immutable mapping from canonical field to its recognized raw labels.
///
/// Loaded once and passed explicitly into normalization; there is no global
/// table. Lookup is case-insensitive on trimmed labels. Resolution walks
/// canonical fields in declaration order ([`CanonicalField::ALL`]), so a
/// label listed under two fields deterministically resolves to the first.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: BTreeMap<CanonicalField, Vec<String>>,
}

impl AliasTable {
    /// Build a table from per-field alias lists. Aliases are stored
    /// trimmed and lowercased.
    pub fn new(entries: impl IntoIterator<Item = (CanonicalField, Vec<String>)>) -> Self {
        let mut aliases: BTreeMap<CanonicalField, Vec<String>> = BTreeMap::new();
        for (field, labels) in entries {
            let slot = aliases.entry(field).or_default();
            for label in labels {
                let cleaned = label.trim().to_lowercase();
                if !cleaned.is_empty() && !slot.contains(&cleaned) {
                    slot.push(cleaned);
                }
            }
        }
        Self { aliases }
    }

    /// The alias lists used by Brazilian ledger and settlement exports.
    #[must_use]
    pub fn default_ptbr() -> Self {
        Self::new([
            (
                CanonicalField::CodigoNsu,
                vec![
                    "código nsu".to_string(),
                    "nsu".to_string(),
                    "código".to_string(),
                    "codigo".to_string(),
                ],
            ),
            (
                CanonicalField::Autorizacao,
                vec![
                    "código de autorizacao".to_string(),
                    "autorizacao".to_string(),
                    "autorização".to_string(),
                ],
            ),
            (
                CanonicalField::CodigoVenda,
                vec![
                    "código da venda".to_string(),
                    "cod venda".to_string(),
                    "codigo venda".to_string(),
                    "codigo da venda".to_string(),
                ],
            ),
            (
                CanonicalField::Data,
                vec![
                    "data".to_string(),
                    "data venda".to_string(),
                    "data da venda".to_string(),
                    "emissão".to_string(),
                ],
            ),
            (
                CanonicalField::Valor,
                vec![
                    "valor".to_string(),
                    "valor bruto".to_string(),
                    "valor da venda".to_string(),
                    "valor original".to_string(),
                ],
            ),
            (
                CanonicalField::Loja,
                vec![
                    "loja".to_string(),
                    "local".to_string(),
                    "unidade".to_string(),
                ],
            ),
        ])
    }

    /// Resolve a raw column label to a canonical field, if any alias (or
    /// the canonical name itself) matches after trim + lowercase.
    #[must_use]
    pub fn resolve(&self, raw_label: &str) -> Option<CanonicalField> {
        let needle = raw_label.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        for field in CanonicalField::ALL {
            if field.as_str() == needle {
                return Some(field);
            }
            if let Some(labels) = self.aliases.get(&field)
                && labels.iter().any(|label| label == &needle)
            {
                return Some(field);
            }
        }
        None
    }

    /// Recognized aliases for one field, for display surfaces.
    #[must_use]
    pub fn aliases_for(&self, field: CanonicalField) -> &[String] {
        self.aliases
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::default_ptbr()
    }
}
