//! Deed fields: parties, recording date, legal description, lien status.

use super::patterns::{GRANTEE, GRANTOR, LEGAL_DESCRIPTION, RECORDING_DATE};
use super::{parse_recording_date, FieldCollector};
use crate::error::ExtractionError;
use crate::models::fields::FieldName;

pub const LIEN_CLEAR: &str = "Clear";
pub const LIENS_PRESENT: &str = "Liens Present";

pub fn extract(text: &str, collector: &mut FieldCollector) -> Result<(), ExtractionError> {
    if let Some(caps) = GRANTOR.captures(text) {
        collector.record(FieldName::Grantor, &caps[1])?;
    }
    if let Some(caps) = GRANTEE.captures(text) {
        collector.record(FieldName::Grantee, &caps[1])?;
    }

    if let Some(caps) = RECORDING_DATE.captures(text) {
        match parse_recording_date(&caps[1]) {
            Ok(date) => {
                collector.insert(FieldName::RecordingDate, date.format("%Y-%m-%d").to_string())?
            }
            Err(err) => collector.contain(err),
        }
    }

    if let Some(caps) = LEGAL_DESCRIPTION.captures(text) {
        collector.record(FieldName::LegalDescription, &caps[1])?;
    }

    if let Some(status) = lien_status(text) {
        collector.insert(FieldName::LienStatus, status)?;
    }

    Ok(())
}

/// `Clear` for "no lien" / "free and clear", `Liens Present` for any other
/// mention of a lien, nothing otherwise.
pub fn lien_status(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if lower.contains("no lien") || lower.contains("free and clear") {
        Some(LIEN_CLEAR)
    } else if lower.contains("lien") {
        Some(LIENS_PRESENT)
    } else {
        None
    }
}
