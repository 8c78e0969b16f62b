//! Topic section isolation for condition assessment.

use regex::{Regex, RegexBuilder};
use tracing::trace;

use super::patterns::SECTION_BOUNDARY;
use crate::error::ExtractionError;

/// Maximum length of a captured section, in characters.
pub const SECTION_MAX_CHARS: usize = 500;

/// Extracts the span of text that follows a topic heading.
///
/// The span starts after the first occurrence of the topic (and any colons
/// or whitespace after it) and runs up to the next line that opens with a
/// one-word `Heading:`, or to the end of the text. A sub-heading without
/// the colon does not end the section.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    heading: Regex,
}

impl SectionExtractor {
    /// Create an extractor for a topic alternation such as `"bathroom|bath"`.
    pub fn new(topic_pattern: &str) -> Result<Self, ExtractionError> {
        let heading = RegexBuilder::new(&format!(r"(?:{})[:\s]*", topic_pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| ExtractionError::InvalidPattern {
                field: topic_pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { heading })
    }

    /// The section text, capped at [`SECTION_MAX_CHARS`], if the topic occurs.
    pub fn extract(&self, text: &str) -> Option<String> {
        let heading = self.heading.find(text)?;
        let body = &text[heading.end()..];

        let end = match SECTION_BOUNDARY.find(body) {
            Some(boundary) => boundary.start(),
            None => body.strip_suffix('\n').unwrap_or(body).len(),
        };

        let section: String = body[..end].chars().take(SECTION_MAX_CHARS).collect();
        trace!(
            "section '{}' at {}: {} chars",
            heading.as_str().trim(),
            heading.start(),
            section.chars().count()
        );
        Some(section)
    }
}

/// Convenience wrapper around [`SectionExtractor`].
pub fn extract_section(text: &str, topic_pattern: &str) -> Result<Option<String>, ExtractionError> {
    Ok(SectionExtractor::new(topic_pattern)?.extract(text))
}
