//! Rule-based field extractor for property documents.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::fields::{ConfidenceMap, DocumentType, ExtractionResult, FieldName};

use super::registry::PatternRegistry;
use super::rules::{deed, inspection, mls, ConditionAssessor, FieldCollector, InfrastructureScorer};
use super::{DocumentExtractor, Result};

/// Extracts typed fields from OCR text.
///
/// Runs the generic pattern table, then the rules for the document type,
/// then scores the result. Holds only read-only state, so one instance can
/// serve any number of threads.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    registry: Arc<PatternRegistry>,
    assessor: ConditionAssessor,
    scorer: InfrastructureScorer,
}

impl FieldExtractor {
    /// Create an extractor over the standard pattern table, scoring against
    /// the current year.
    pub fn new() -> Self {
        Self::with_registry(PatternRegistry::standard())
    }

    /// Create an extractor over a custom pattern table.
    pub fn with_registry(registry: Arc<PatternRegistry>) -> Self {
        let assessor = ConditionAssessor::new(registry.conditions().clone());
        Self {
            registry,
            assessor,
            scorer: InfrastructureScorer::current(),
        }
    }

    /// Fix the year building age is measured against.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.scorer = InfrastructureScorer::new(year);
        self
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        let extractor = Self::new();
        match config.reference_year {
            Some(year) => extractor.with_reference_year(year),
            None => extractor,
        }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn reference_year(&self) -> i32 {
        self.scorer.reference_year()
    }

    fn extract_generic(&self, text: &str, collector: &mut FieldCollector) -> Result<()> {
        for entry in self.registry.entries() {
            if let Some(raw) = entry.first_match(text) {
                collector.record(entry.field(), raw)?;
            }
        }
        Ok(())
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for FieldExtractor {
    fn extract(&self, text: &str, doc_type: DocumentType) -> Result<ExtractionResult> {
        // No monotonic clock on wasm32-unknown-unknown
        #[cfg(not(target_arch = "wasm32"))]
        let start = Some(Instant::now());
        #[cfg(target_arch = "wasm32")]
        let start: Option<Instant> = None;

        if text.trim().is_empty() {
            return Err(ExtractionError::InvalidInput("text is empty".to_string()));
        }

        info!("Extracting {} fields from {} chars", doc_type, text.len());

        let mut collector = FieldCollector::new();
        self.extract_generic(text, &mut collector)?;

        match doc_type {
            DocumentType::Mls => mls::extract(text, &mut collector)?,
            DocumentType::Inspection => inspection::extract(text, &self.assessor, &mut collector)?,
            DocumentType::Deed => deed::extract(text, &mut collector)?,
            DocumentType::General => {}
        }

        let score = self.scorer.score(text, collector.fields());
        collector.insert(FieldName::InfrastructureScore, score)?;

        let (fields, warnings) = collector.into_parts();
        let confidence = ConfidenceMap::for_fields(&fields);
        let processing_time_ms = start.map_or(0, |t| t.elapsed().as_millis() as u64);

        debug!(
            "Extracted {} fields ({} warnings) in {}ms",
            fields.len(),
            warnings.len(),
            processing_time_ms
        );

        Ok(ExtractionResult {
            fields,
            confidence,
            doc_type,
            warnings,
            processing_time_ms,
        })
    }
}
