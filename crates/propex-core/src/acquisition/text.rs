//! Plain text documents, typically output of an external OCR run.

use super::{AcquiredText, Result, TextAcquirer, MIME_TEXT};

const PAGE_BREAK: char = '\x0c';

/// Reads UTF-8 text files. Form feeds separate pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextAcquirer;

impl TextAcquirer for PlainTextAcquirer {
    fn supports(&self, mime_type: &str) -> bool {
        mime_type == MIME_TEXT
    }

    fn acquire(&self, data: &[u8], _mime_type: &str) -> Result<AcquiredText> {
        let text = String::from_utf8(data.to_vec())?;
        let pages = text
            .split(PAGE_BREAK)
            .filter(|page| !page.trim().is_empty())
            .count();

        Ok(AcquiredText {
            page_count: pages.max(1) as u32,
            text,
            confidence: 0.99,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquisitionError;

    #[test]
    fn test_pages_split_on_form_feed() {
        let acquired = PlainTextAcquirer
            .acquire(b"Roof:\ngood\x0cKitchen:\nfair\x0c", MIME_TEXT)
            .unwrap();
        assert_eq!(acquired.page_count, 2);
        assert_eq!(acquired.confidence, 0.99);
    }

    #[test]
    fn test_invalid_utf8() {
        let err = PlainTextAcquirer.acquire(&[0xff, 0xfe, 0x41], MIME_TEXT).unwrap_err();
        assert!(matches!(err, AcquisitionError::InvalidEncoding(_)));
    }
}
