//! Error types for the propex-core library.

use thiserror::Error;

use crate::models::fields::{FieldKind, FieldName};

/// Main error type for the propex library.
#[derive(Error, Debug)]
pub enum PropexError {
    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Text acquisition error.
    #[error("acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to field extraction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The request itself is unusable (empty text, unknown document type).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A matched substring could not be converted to the field's type.
    #[error("could not normalize {field}: {value:?}")]
    Normalization { field: FieldName, value: String },

    /// A recording date could not be parsed.
    #[error("could not parse date: {0:?}")]
    DateParse(String),

    /// A pattern table or topic pattern is malformed.
    #[error("invalid pattern for {field}: {reason}")]
    InvalidPattern { field: String, reason: String },

    /// A value of the wrong kind was stored under a field.
    #[error("{field} expects a value of kind {expected}")]
    TypeMismatch { field: FieldName, expected: FieldKind },

    /// Any other fault while processing a single document.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while turning file bytes into text.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// No acquirer handles this MIME type.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// Plain text input was not valid UTF-8.
    #[error("text is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    /// The document only carries page images; character recognition is required.
    #[error("document has no embedded text and requires OCR")]
    RequiresOcr,

    /// Nothing readable was found.
    #[error("no text could be acquired")]
    NoText,

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),
}

/// Result type for the propex library.
pub type Result<T> = std::result::Result<T, PropexError>;
