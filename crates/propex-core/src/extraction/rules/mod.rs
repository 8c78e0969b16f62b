//! Rule-based extractors for real-estate documents.

pub mod condition;
pub mod dates;
pub mod deed;
pub mod inspection;
pub mod mls;
pub mod normalize;
pub mod patterns;
pub mod score;
pub mod section;

pub use condition::{assess_condition, ConditionAssessor};
pub use dates::parse_recording_date;
pub use normalize::normalize;
pub use score::InfrastructureScorer;
pub use section::{extract_section, SectionExtractor, SECTION_MAX_CHARS};

use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::fields::{ExtractedFields, FieldName, FieldValue};

/// Accumulates fields for one document and records contained failures.
#[derive(Debug, Default)]
pub struct FieldCollector {
    fields: ExtractedFields,
    warnings: Vec<String>,
}

impl FieldCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `raw` and store it. A normalization failure omits the
    /// field and is kept as a warning.
    pub fn record(&mut self, field: FieldName, raw: &str) -> Result<(), ExtractionError> {
        match normalize(field, raw) {
            Ok(value) => self.insert(field, value),
            Err(err @ ExtractionError::Normalization { .. }) => {
                self.contain(err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Store an already typed value.
    pub fn insert(
        &mut self,
        field: FieldName,
        value: impl Into<FieldValue>,
    ) -> Result<(), ExtractionError> {
        let value = value.into();
        debug!("{} = {}", field, value);
        self.fields.insert(field, value)
    }

    /// Keep a per-field failure without aborting the document.
    pub fn contain(&mut self, err: ExtractionError) {
        warn!("field omitted: {}", err);
        self.warnings.push(err.to_string());
    }

    pub fn fields(&self) -> &ExtractedFields {
        &self.fields
    }

    pub fn into_parts(self) -> (ExtractedFields, Vec<String>) {
        (self.fields, self.warnings)
    }
}
