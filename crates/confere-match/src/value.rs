//! Canonical key values.
//!
//! Source spreadsheets disagree on locale formatting: the same sale shows
//! up as `"100.00"` in one report and `"R$ 100,00"` in another, dates as
//! ISO in one and `dd/mm/yyyy` in the next. Comparing raw strings would
//! produce false mismatches, so every key value is canonicalized before
//! any equality check: amounts to fixed-point decimals, dates to calendar
//! dates, text trimmed verbatim.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use confere_model::{CanonicalField, CellValue, FieldKind};

/// Accepted textual formats for dates and datetimes.
///
/// Explicit configuration rather than open-ended guessing: these lists are
/// the contract for what the matcher will parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub date_formats: Vec<String>,
    pub datetime_formats: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%d/%m/%Y".to_string(),
                "%d/%m/%y".to_string(),
                "%d-%m-%Y".to_string(),
            ],
            datetime_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%d/%m/%Y %H:%M:%S".to_string(),
            ],
        }
    }
}

/// A key field value after canonicalization. Equality and hashing operate
/// on these, never on raw source strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Text(String),
    Amount(Decimal),
    Date(NaiveDate),
}

/// Outcome of canonicalizing one cell for one key field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Canonical {
    Value(KeyValue),
    /// Empty or absent cell: the record can never match on this key.
    Missing,
    /// Non-empty value that does not parse as the field's type.
    Invalid(String),
}

/// Canonicalize a cell against a field's kind.
#[must_use]
pub fn canonicalize(field: CanonicalField, cell: &CellValue, options: &ParseOptions) -> Canonical {
    match field.kind() {
        FieldKind::Text => match cell {
            CellValue::Missing => Canonical::Missing,
            CellValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Canonical::Missing
                } else {
                    Canonical::Value(KeyValue::Text(trimmed.to_string()))
                }
            }
            // Identifier columns sometimes arrive as spreadsheet numbers.
            CellValue::Number(number) => {
                Canonical::Value(KeyValue::Text(number.normalize().to_string()))
            }
            CellValue::Date(date) => {
                Canonical::Value(KeyValue::Text(date.format("%Y-%m-%d").to_string()))
            }
        },
        FieldKind::Amount => match cell {
            CellValue::Missing => Canonical::Missing,
            CellValue::Number(number) => Canonical::Value(KeyValue::Amount(number.normalize())),
            CellValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Canonical::Missing;
                }
                match parse_amount(trimmed) {
                    Some(amount) => Canonical::Value(KeyValue::Amount(amount)),
                    None => Canonical::Invalid(trimmed.to_string()),
                }
            }
            CellValue::Date(date) => Canonical::Invalid(date.format("%Y-%m-%d").to_string()),
        },
        FieldKind::Date => match cell {
            CellValue::Missing => Canonical::Missing,
            CellValue::Date(date) => Canonical::Value(KeyValue::Date(*date)),
            CellValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Canonical::Missing;
                }
                match parse_date(trimmed, options) {
                    Some(date) => Canonical::Value(KeyValue::Date(date)),
                    None => Canonical::Invalid(trimmed.to_string()),
                }
            }
            CellValue::Number(number) => Canonical::Invalid(number.to_string()),
        },
    }
}

/// Parse a monetary amount into a normalized fixed-point decimal.
///
/// Accepts pt-BR (`1.234,56`), en-US (`1,234.56`) and plain (`1234.56`)
/// notation, with an optional currency marker. When both separators occur
/// the one appearing last is the decimal point.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut cleaned: String = raw
        .replace("R$", "")
        .replace('$', "")
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\u{a0}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();
    match (dots, commas) {
        (0, 0) => {}
        (_, 0) => {
            // Multiple dots can only be grouping separators.
            if dots > 1 {
                cleaned = cleaned.replace('.', "");
            }
        }
        (0, _) => {
            if commas == 1 {
                cleaned = cleaned.replace(',', ".");
            } else {
                cleaned = cleaned.replace(',', "");
            }
        }
        (_, _) => {
            let last_dot = cleaned.rfind('.').unwrap_or(0);
            let last_comma = cleaned.rfind(',').unwrap_or(0);
            if last_comma > last_dot {
                cleaned = cleaned.replace('.', "").replace(',', ".");
            } else {
                cleaned = cleaned.replace(',', "");
            }
        }
    }
    Decimal::from_str(&cleaned).ok().map(|amount| amount.normalize())
}

/// Parse a date using the configured format lists, date formats first.
#[must_use]
pub fn parse_date(raw: &str, options: &ParseOptions) -> Option<NaiveDate> {
    for format in &options.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in &options.datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    None
}
