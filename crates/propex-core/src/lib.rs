//! Core library for real-estate document field extraction.
//!
//! This crate provides:
//! - Text acquisition from plain text and PDF files (embedded text layer)
//! - Pattern-driven extraction of listing, inspection and deed fields
//! - Condition grading and an infrastructure score
//! - Typed result models with per-field confidence

pub mod acquisition;
pub mod error;
pub mod extraction;
pub mod models;

pub use acquisition::{AcquiredText, AcquisitionPipeline, PlainTextAcquirer, TextAcquirer};
#[cfg(feature = "native")]
pub use acquisition::{PdfTextAcquirer, PdfType};
pub use error::{AcquisitionError, ExtractionError, PdfError, PropexError, Result};
pub use extraction::{DocumentExtractor, FieldExtractor, PatternRegistry};
pub use models::config::PropexConfig;
pub use models::fields::{
    BatchDocument, BatchResponse, BatchResult, ConditionGrade, ConfidenceMap, DocumentType,
    ExtractedFields, ExtractionResult, FieldKind, FieldName, FieldValue,
};
