//! Field extraction from real-estate document text.

mod parser;
pub mod registry;
pub mod rules;

pub use parser::FieldExtractor;
pub use registry::{ConditionTaxonomy, PatternEntry, PatternRegistry};

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use tracing::{error, info};

use crate::error::ExtractionError;
use crate::models::fields::{
    BatchDocument, BatchResponse, BatchResult, DocumentType, ExtractionResult,
};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for document field extractors.
pub trait DocumentExtractor {
    /// Extract fields from one document's text.
    fn extract(&self, text: &str, doc_type: DocumentType) -> Result<ExtractionResult>;

    /// Extract every document, keeping input order and ids.
    ///
    /// A document that fails, or panics, yields an entry with empty fields
    /// and an error message; the remaining documents are unaffected.
    fn extract_batch(&self, documents: &[BatchDocument]) -> BatchResponse {
        info!("Extracting batch of {} documents", documents.len());

        let results = documents
            .iter()
            .map(|doc| settle(doc.id.clone(), self.extract_guarded(&doc.text, doc.doc_type)))
            .collect();

        BatchResponse { results }
    }

    /// Like [`extract_batch`](Self::extract_batch), over untyped entries.
    ///
    /// Each entry is read on its own, so an entry with an unknown
    /// `doc_type` or a non-string `text` fails alone, under its own id.
    fn extract_entries(&self, entries: &[Value]) -> BatchResponse {
        info!("Extracting batch of {} entries", entries.len());

        let results = entries
            .iter()
            .map(|entry| match BatchDocument::from_value(entry) {
                Ok(doc) => settle(doc.id, self.extract_guarded(&doc.text, doc.doc_type)),
                Err(e) => settle(BatchDocument::entry_id(entry), Err(e)),
            })
            .collect();

        BatchResponse { results }
    }

    /// Run [`extract`](Self::extract), turning a panic into
    /// [`ExtractionError::Unexpected`].
    fn extract_guarded(&self, text: &str, doc_type: DocumentType) -> Result<ExtractionResult> {
        panic::catch_unwind(AssertUnwindSafe(|| self.extract(text, doc_type))).unwrap_or_else(
            |payload| {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "extraction panicked".to_string());
                Err(ExtractionError::Unexpected(message))
            },
        )
    }
}

fn settle(id: Value, outcome: Result<ExtractionResult>) -> BatchResult {
    match outcome {
        Ok(result) => BatchResult::success(id, result.fields),
        Err(e) => {
            error!("Document {} failed: {}", id, e);
            BatchResult::failure(id, e)
        }
    }
}
