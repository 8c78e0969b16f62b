//! Conversion of matched substrings into typed field values.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ExtractionError;
use crate::models::fields::{FieldKind, FieldName, FieldValue};

/// Convert raw matched text into the value type declared for `field`.
///
/// - integer fields keep only the digits (`"$450,000"` -> `450000`)
/// - decimal fields keep digits and decimal points (`"2.5 "` -> `2.5`)
/// - text fields are trimmed
pub fn normalize(field: FieldName, raw: &str) -> Result<FieldValue, ExtractionError> {
    let failed = || ExtractionError::Normalization {
        field,
        value: raw.to_string(),
    };

    match field.kind() {
        FieldKind::Integer => {
            let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
            digits
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| failed())
        }
        FieldKind::Decimal => {
            let cleaned: String = raw
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            Decimal::from_str(&cleaned)
                .map(FieldValue::Decimal)
                .map_err(|_| failed())
        }
        FieldKind::Text => Ok(FieldValue::Text(raw.trim().to_string())),
    }
}
