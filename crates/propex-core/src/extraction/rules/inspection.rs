//! Inspection report fields: per-component condition and roof age.

use lazy_static::lazy_static;
use tracing::debug;

use super::patterns::{INSPECTION_TOPICS, ROOF_AGE};
use super::{ConditionAssessor, FieldCollector, SectionExtractor};
use crate::error::ExtractionError;
use crate::models::fields::FieldName;

lazy_static! {
    static ref TOPIC_SECTIONS: Vec<(FieldName, SectionExtractor)> = INSPECTION_TOPICS
        .iter()
        .map(|(field, topic)| {
            let extractor = SectionExtractor::new(topic).expect("built-in topic pattern must compile");
            (*field, extractor)
        })
        .collect();
}

/// Grade each inspected component whose section is present.
pub fn extract(
    text: &str,
    assessor: &ConditionAssessor,
    collector: &mut FieldCollector,
) -> Result<(), ExtractionError> {
    for (field, extractor) in TOPIC_SECTIONS.iter() {
        let Some(section) = extractor.extract(text) else {
            continue;
        };

        if *field == FieldName::RoofCondition {
            if let Some(caps) = ROOF_AGE.captures(&section) {
                collector.record(FieldName::RoofAge, &caps[1])?;
            }
        }

        let grade = assessor.assess(&section);
        debug!("{} graded {} from {} chars", field, grade, section.len());
        collector.insert(*field, grade.as_str())?;
    }

    Ok(())
}
