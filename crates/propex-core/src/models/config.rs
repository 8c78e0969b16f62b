//! Configuration structures for the extraction pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PropexError, Result};

/// Main configuration for propex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropexConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Text acquisition configuration.
    pub acquisition: AcquisitionConfig,

    /// Batch runner configuration.
    pub batch: BatchConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reference year for the building-age adjustment.
    /// `None` uses the current calendar year.
    pub reference_year: Option<i32>,
}

/// Text acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Keep blank lines when normalizing acquired text.
    pub keep_blank_lines: bool,

    /// Minimum embedded text length for a PDF to count as text-based.
    pub min_text_length: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            keep_blank_lines: false,
            min_text_length: 50,
        }
    }
}

/// Batch runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of documents processed concurrently.
    pub jobs: usize,

    /// Wall-clock limit per document, in milliseconds.
    pub document_timeout_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            document_timeout_ms: 10_000,
        }
    }
}

impl PropexConfig {
    /// Load configuration from a JSON file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PropexError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PropexError::Config(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Look up a dotted key such as `batch.jobs`.
    pub fn get(&self, key: &str) -> Result<Value> {
        let json = self.to_value()?;
        key.split('.')
            .try_fold(&json, |node, part| node.get(part))
            .cloned()
            .ok_or_else(|| unknown_key(key))
    }

    /// Set a dotted key from its command-line form.
    ///
    /// The value is read as JSON, falling back to a bare string, and must
    /// deserialize into the key's declared type. Only existing keys can be set.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<Value> {
        let value: Value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        let mut json = self.to_value()?;
        let (last, parents) = key
            .rsplit_once('.')
            .map_or((key, None), |(head, last)| (last, Some(head)));

        let mut section = &mut json;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            section = section.get_mut(part).ok_or_else(|| unknown_key(key))?;
        }
        match section.as_object_mut() {
            Some(map) if map.contains_key(last) => {
                map.insert(last.to_string(), value.clone());
            }
            _ => return Err(unknown_key(key)),
        }

        *self = serde_json::from_value(json)
            .map_err(|e| PropexError::Config(format!("invalid value for {}: {}", key, e)))?;
        Ok(value)
    }

    fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| PropexError::Config(e.to_string()))
    }
}

fn unknown_key(key: &str) -> PropexError {
    PropexError::Config(format!("unknown key: {}", key))
}
