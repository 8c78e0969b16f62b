//! Embedded text of PDF documents, via lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace};

use super::{AcquiredText, Result, TextAcquirer, MIME_PDF};
use crate::error::{AcquisitionError, PdfError};

/// Kind of content a PDF carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned document).
    Image,
    /// Contains both text and images.
    Hybrid,
    /// Empty or unreadable.
    Empty,
}

impl PdfType {
    /// Classify from the amount of embedded text and the number of images.
    pub fn classify(text_len: usize, image_count: usize, min_text_length: usize) -> Self {
        let has_text = text_len >= min_text_length.max(1);
        match (has_text, image_count > 0) {
            (true, false) => PdfType::Text,
            (false, true) => PdfType::Image,
            (true, true) => PdfType::Hybrid,
            (false, false) if text_len > 0 => PdfType::Text,
            (false, false) => PdfType::Empty,
        }
    }
}

/// Reads the text layer of PDFs.
#[derive(Debug, Clone)]
pub struct PdfTextAcquirer {
    /// Below this many characters a PDF with images counts as scanned.
    min_text_length: usize,
}

impl PdfTextAcquirer {
    pub fn new(min_text_length: usize) -> Self {
        Self { min_text_length }
    }

    /// Parse the document, decrypting it when it only has an empty password.
    ///
    /// Returns the document with the bytes pdf-extract should read.
    fn load(data: &[u8]) -> std::result::Result<(Document, Vec<u8>), PdfError> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        Ok((doc, raw))
    }
}

impl Default for PdfTextAcquirer {
    fn default() -> Self {
        Self::new(50)
    }
}

impl TextAcquirer for PdfTextAcquirer {
    fn supports(&self, mime_type: &str) -> bool {
        mime_type == MIME_PDF
    }

    fn acquire(&self, data: &[u8], _mime_type: &str) -> Result<AcquiredText> {
        let (doc, raw) = Self::load(data)?;
        let page_count = doc.get_pages().len() as u32;

        let text = pdf_extract::extract_text_from_mem(&raw)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let text_len = text.trim().chars().count();
        let images = count_images(&doc);

        let pdf_type = PdfType::classify(text_len, images, self.min_text_length);
        debug!(
            "PDF analysis: {} pages, {} chars text, {} images -> {:?}",
            page_count, text_len, images, pdf_type
        );

        match pdf_type {
            PdfType::Text | PdfType::Hybrid => Ok(AcquiredText {
                text,
                page_count,
                confidence: 0.95,
            }),
            PdfType::Image => Err(AcquisitionError::RequiresOcr),
            PdfType::Empty => Err(AcquisitionError::NoText),
        }
    }
}

/// Number of image XObjects in the document. Images are not decoded.
fn count_images(doc: &Document) -> usize {
    doc.objects
        .values()
        .filter(|object| match object {
            Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false),
            _ => false,
        })
        .inspect(|_| trace!("Found image object"))
        .count()
}
