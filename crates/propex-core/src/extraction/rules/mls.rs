//! MLS listing fields.

use regex::Regex;

use super::patterns::{DAYS_ON_MARKET, HOA_FEE, TAX_ASSESSMENT};
use super::FieldCollector;
use crate::error::ExtractionError;
use crate::models::fields::FieldName;

/// Look up tax assessment, HOA fee and days on market. Each is optional.
pub fn extract(text: &str, collector: &mut FieldCollector) -> Result<(), ExtractionError> {
    let rules: [(FieldName, &Regex); 3] = [
        (FieldName::TaxAssessment, &*TAX_ASSESSMENT),
        (FieldName::HoaFee, &*HOA_FEE),
        (FieldName::DaysOnMarket, &*DAYS_ON_MARKET),
    ];

    for (field, pattern) in rules {
        if let Some(caps) = pattern.captures(text) {
            collector.record(field, &caps[1])?;
        }
    }

    Ok(())
}
