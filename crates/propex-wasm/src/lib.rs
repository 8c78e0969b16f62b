//! WASM bindings for real-estate document field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use propex_core::extraction::rules::assess_condition;
use propex_core::extraction::{DocumentExtractor, FieldExtractor};
use propex_core::models::fields::{DocumentType, ExtractionResult};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract fields from document text.
///
/// `doc_type` is one of `general` (default), `mls`, `inspection`, `deed`.
/// Returns `{fields, confidence, doc_type, warnings?}`.
#[wasm_bindgen]
pub fn extract_fields(text: &str, doc_type: Option<String>) -> Result<JsValue, JsValue> {
    run_extract(&FieldExtractor::new(), text, doc_type.as_deref())
}

/// Extract fields from an ordered list of `{id, text, doc_type}` documents.
///
/// Accepts an array or `{documents: [...]}` and returns `{results: [...]}`
/// in input order. A failing document carries an `error` instead of
/// failing the call.
#[wasm_bindgen]
pub fn extract_batch(documents: JsValue) -> Result<JsValue, JsValue> {
    run_batch(&FieldExtractor::new(), documents)
}

/// Grade a free-text condition description (`excellent`, `good`, `fair`,
/// `poor` or `unknown`).
#[wasm_bindgen]
pub fn grade_condition(description: &str) -> String {
    assess_condition(description).to_string()
}

/// Field extractor class for browser use.
#[wasm_bindgen]
pub struct PropertyExtractor {
    extractor: FieldExtractor,
}

#[wasm_bindgen]
impl PropertyExtractor {
    /// Create a new extractor. Building age is measured against
    /// `reference_year`, or the current year when omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(reference_year: Option<i32>) -> Self {
        let extractor = FieldExtractor::new();
        Self {
            extractor: match reference_year {
                Some(year) => extractor.with_reference_year(year),
                None => extractor,
            },
        }
    }

    #[wasm_bindgen(getter)]
    pub fn reference_year(&self) -> i32 {
        self.extractor.reference_year()
    }

    /// Extract fields from document text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, doc_type: Option<String>) -> Result<JsValue, JsValue> {
        run_extract(&self.extractor, text, doc_type.as_deref())
    }

    /// Extract fields from a list of documents.
    #[wasm_bindgen]
    pub fn extract_batch(&self, documents: JsValue) -> Result<JsValue, JsValue> {
        run_batch(&self.extractor, documents)
    }
}

impl Default for PropertyExtractor {
    fn default() -> Self {
        Self::new(None)
    }
}

fn run_extract(
    extractor: &FieldExtractor,
    text: &str,
    doc_type: Option<&str>,
) -> Result<JsValue, JsValue> {
    let doc_type = match doc_type {
        Some(label) => label.parse::<DocumentType>().map_err(js_error)?,
        None => DocumentType::default(),
    };

    let result: ExtractionResult = extractor.extract(text, doc_type).map_err(js_error)?;
    for warning in &result.warnings {
        web_sys::console::warn_1(&JsValue::from_str(warning));
    }

    to_js(&result)
}

fn run_batch(extractor: &FieldExtractor, documents: JsValue) -> Result<JsValue, JsValue> {
    let documents = if js_sys::Array::is_array(&documents) {
        documents
    } else {
        js_sys::Reflect::get(&documents, &JsValue::from_str("documents"))?
    };

    // Entries are read one by one so a malformed entry fails on its own
    let entries: Vec<serde_json::Value> =
        serde_wasm_bindgen::from_value(documents).map_err(js_error)?;

    to_js(&extractor.extract_entries(&entries))
}

/// Plain JS objects rather than `Map`s, so results read like JSON.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
