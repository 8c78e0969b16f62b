//! Turning document files into extraction-ready text.
//!
//! Character recognition is not performed here. Plain text files are read
//! as-is and PDFs only yield their embedded text layer; scanned pages are
//! reported as [`AcquisitionError::RequiresOcr`].

#[cfg(feature = "native")]
mod pdf;
mod text;

#[cfg(feature = "native")]
pub use pdf::{PdfTextAcquirer, PdfType};
pub use text::PlainTextAcquirer;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AcquisitionError;
use crate::models::config::AcquisitionConfig;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";

/// Result type for acquisition operations.
pub type Result<T> = std::result::Result<T, AcquisitionError>;

/// Text recovered from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquiredText {
    pub text: String,
    pub page_count: u32,
    /// How much the text can be trusted to match the document (0.0 - 1.0).
    pub confidence: f32,
}

/// Source of document text for one family of file types.
pub trait TextAcquirer: Send + Sync {
    /// Whether this acquirer handles `mime_type`.
    fn supports(&self, mime_type: &str) -> bool;

    /// Recover the text of a document.
    fn acquire(&self, data: &[u8], mime_type: &str) -> Result<AcquiredText>;
}

/// Routes files to the matching acquirer and cleans up whitespace.
pub struct AcquisitionPipeline {
    acquirers: Vec<Box<dyn TextAcquirer>>,
    keep_blank_lines: bool,
}

impl AcquisitionPipeline {
    /// Pipeline with every acquirer available in this build.
    pub fn new(config: &AcquisitionConfig) -> Self {
        let pipeline = Self::empty(config.keep_blank_lines).with(PlainTextAcquirer);
        #[cfg(feature = "native")]
        let pipeline = pipeline.with(PdfTextAcquirer::new(config.min_text_length));
        pipeline
    }

    /// Pipeline without acquirers.
    pub fn empty(keep_blank_lines: bool) -> Self {
        Self {
            acquirers: Vec::new(),
            keep_blank_lines,
        }
    }

    /// Register an acquirer. Earlier registrations win.
    pub fn with(mut self, acquirer: impl TextAcquirer + 'static) -> Self {
        self.acquirers.push(Box::new(acquirer));
        self
    }

    pub fn acquire(&self, data: &[u8], mime_type: &str) -> Result<AcquiredText> {
        let acquirer = self
            .acquirers
            .iter()
            .find(|a| a.supports(mime_type))
            .ok_or_else(|| AcquisitionError::UnsupportedType(mime_type.to_string()))?;

        let mut acquired = acquirer.acquire(data, mime_type)?;
        acquired.text = normalize_whitespace(&acquired.text, self.keep_blank_lines);

        debug!(
            "Acquired {} chars over {} pages from {}",
            acquired.text.len(),
            acquired.page_count,
            mime_type
        );
        Ok(acquired)
    }

    /// Read a file and acquire its text, guessing the type from the extension.
    pub fn acquire_file(&self, path: &Path) -> crate::Result<AcquiredText> {
        let data = std::fs::read(path)?;
        Ok(self.acquire(&data, mime_type_for_path(path))?)
    }
}

/// Trim every line and drop empty ones unless `keep_blank_lines` is set.
/// Page breaks become line breaks.
pub fn normalize_whitespace(text: &str, keep_blank_lines: bool) -> String {
    let text = text.replace("\r\n", "\n").replace(['\r', '\x0c'], "\n");
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| keep_blank_lines || !line.is_empty())
        .collect();
    lines.join("\n").trim_matches('\n').to_string()
}

/// Guess a MIME type from a file extension.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => MIME_PDF,
        "txt" | "text" | "md" | "ocr" => MIME_TEXT,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_whitespace() {
        let raw = "  Roof:  \r\n\n   Good shape \x0cPage two\n\n";
        assert_eq!(normalize_whitespace(raw, false), "Roof:\nGood shape\nPage two");
        assert_eq!(normalize_whitespace(raw, true), "Roof:\n\nGood shape\nPage two");
    }

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(mime_type_for_path(Path::new("deed.PDF")), MIME_PDF);
        assert_eq!(mime_type_for_path(Path::new("scan/listing.txt")), MIME_TEXT);
        assert_eq!(mime_type_for_path(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_pipeline_routes_by_mime() {
        let pipeline = AcquisitionPipeline::new(&AcquisitionConfig::default());

        let acquired = pipeline.acquire(b"  List Price: $1 \n\n", MIME_TEXT).unwrap();
        assert_eq!(acquired.text, "List Price: $1");
        assert_eq!(acquired.page_count, 1);

        let err = pipeline.acquire(b"\x89PNG", "image/png").unwrap_err();
        assert!(matches!(err, AcquisitionError::UnsupportedType(ref m) if m == "image/png"));
    }

    #[test]
    fn test_custom_acquirer() {
        struct Fixed;

        impl TextAcquirer for Fixed {
            fn supports(&self, mime_type: &str) -> bool {
                mime_type == "image/png"
            }

            fn acquire(&self, _data: &[u8], _mime_type: &str) -> Result<AcquiredText> {
                Ok(AcquiredText {
                    text: " Beds: 2 \n".to_string(),
                    page_count: 1,
                    confidence: 0.8,
                })
            }
        }

        let pipeline = AcquisitionPipeline::empty(false).with(Fixed);
        let acquired = pipeline.acquire(&[], "image/png").unwrap();
        assert_eq!(acquired.text, "Beds: 2");
        assert!(pipeline.acquire(&[], MIME_TEXT).is_err());
    }
}
