//! Field vocabulary and extraction result models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Confidence attached to fields taken directly from a pattern match.
pub const PATTERN_CONFIDENCE: f64 = 0.9;

/// Confidence attached to derived (calculated) fields.
pub const DERIVED_CONFIDENCE: f64 = 0.7;

/// Kind of real-estate document, selecting the type-specific rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Generic pass only.
    #[default]
    General,
    /// MLS listing sheet.
    Mls,
    /// Home inspection report.
    Inspection,
    /// Recorded deed.
    Deed,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Mls => "mls",
            Self::Inspection => "inspection",
            Self::Deed => "deed",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(Self::General),
            "mls" => Ok(Self::Mls),
            "inspection" => Ok(Self::Inspection),
            "deed" => Ok(Self::Deed),
            other => Err(ExtractionError::InvalidInput(format!(
                "unknown document type '{}'",
                other
            ))),
        }
    }
}

/// Declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Decimal,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

macro_rules! field_names {
    ($($variant:ident => $name:literal, $kind:ident;)+) => {
        /// Closed vocabulary of extractable fields.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum FieldName {
            $($variant,)+
        }

        impl FieldName {
            /// Every field, in declaration order.
            pub const ALL: &'static [FieldName] = &[$(FieldName::$variant,)+];

            /// Wire name of the field.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Declared value type, fixed for the life of the process.
            pub fn kind(&self) -> FieldKind {
                match self {
                    $(Self::$variant => FieldKind::$kind,)+
                }
            }
        }

        impl FromStr for FieldName {
            type Err = ExtractionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(ExtractionError::InvalidInput(format!("unknown field '{}'", other))),
                }
            }
        }
    };
}

field_names! {
    Address => "address", Text;
    Price => "price", Integer;
    Beds => "beds", Integer;
    Baths => "baths", Decimal;
    Sqft => "sqft", Integer;
    YearBuilt => "year_built", Integer;
    LotSize => "lot_size", Text;
    PropertyType => "property_type", Text;
    MlsNumber => "mls_number", Text;
    TaxAssessment => "tax_assessment", Integer;
    HoaFee => "hoa_fee", Integer;
    DaysOnMarket => "days_on_market", Integer;
    RoofAge => "roof_age", Integer;
    RoofCondition => "roof_condition", Text;
    HvacCondition => "hvac_condition", Text;
    KitchenCondition => "kitchen_condition", Text;
    BathroomCondition => "bathroom_condition", Text;
    FoundationCondition => "foundation_condition", Text;
    Grantor => "grantor", Text;
    Grantee => "grantee", Text;
    RecordingDate => "recording_date", Text;
    LegalDescription => "legal_description", Text;
    LienStatus => "lien_status", Text;
    InfrastructureScore => "infrastructure_score", Integer;
}

impl FieldName {
    /// Whether the field is calculated rather than matched.
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::InfrastructureScore)
    }

    /// Fixed confidence for values of this field.
    pub fn confidence(&self) -> f64 {
        if self.is_derived() {
            DERIVED_CONFIDENCE
        } else {
            PATTERN_CONFIDENCE
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Decimal(#[serde(with = "rust_decimal::serde::float")] Decimal),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Integer(_) => FieldKind::Integer,
            Self::Decimal(_) => FieldKind::Decimal,
            Self::Text(_) => FieldKind::Text,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Extracted field set. Keys are unique and entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedFields(BTreeMap<FieldName, FieldValue>);

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, rejecting values whose kind differs from the field's.
    pub fn insert(
        &mut self,
        field: FieldName,
        value: impl Into<FieldValue>,
    ) -> Result<(), ExtractionError> {
        let value = value.into();
        if value.kind() != field.kind() {
            return Err(ExtractionError::TypeMismatch {
                field,
                expected: field.kind(),
            });
        }
        self.0.insert(field, value);
        Ok(())
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FieldValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }
}

/// Per-field confidence, keyed identically to [`ExtractedFields`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceMap(BTreeMap<FieldName, f64>);

impl ConfidenceMap {
    /// Build the map for a finished field set.
    pub fn for_fields(fields: &ExtractedFields) -> Self {
        Self(fields.keys().map(|f| (f, f.confidence())).collect())
    }

    pub fn get(&self, field: FieldName) -> Option<f64> {
        self.0.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &f64)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }
}

/// Coarse qualitative state of an inspected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionGrade {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl ConditionGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConditionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionGrade {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            "unknown" => Ok(Self::Unknown),
            other => Err(ExtractionError::InvalidInput(format!(
                "unknown condition grade '{}'",
                other
            ))),
        }
    }
}

/// Result of extracting fields from one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted, typed fields.
    pub fields: ExtractedFields,
    /// Confidence per extracted field.
    pub confidence: ConfidenceMap,
    /// Document type the rules ran under.
    pub doc_type: DocumentType,
    /// Per-field failures that were contained.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    #[serde(skip)]
    pub processing_time_ms: u64,
}

/// One document of a batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDocument {
    /// Opaque caller identifier, echoed back.
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub doc_type: DocumentType,
}

impl BatchDocument {
    pub fn new(id: impl Into<serde_json::Value>, text: impl Into<String>, doc_type: DocumentType) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            doc_type,
        }
    }

    /// Read one untyped batch entry.
    ///
    /// A missing or null `text` is empty and a missing or null `doc_type` is
    /// `general`; labels parse like [`DocumentType::from_str`]. Anything else
    /// that cannot be read is `InvalidInput`, so the caller can report it
    /// against [`entry_id`](Self::entry_id) without dropping the batch.
    pub fn from_value(entry: &serde_json::Value) -> Result<Self, ExtractionError> {
        use serde_json::Value;

        let object = entry.as_object().ok_or_else(|| {
            ExtractionError::InvalidInput("batch entry must be an object".to_string())
        })?;

        let text = match object.get("text") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(_) => {
                return Err(ExtractionError::InvalidInput("text must be a string".to_string()));
            }
        };

        let doc_type = match object.get("doc_type") {
            None | Some(Value::Null) => DocumentType::default(),
            Some(Value::String(label)) => label.parse()?,
            Some(_) => {
                return Err(ExtractionError::InvalidInput(
                    "doc_type must be a string".to_string(),
                ));
            }
        };

        Ok(Self::new(Self::entry_id(entry), text, doc_type))
    }

    /// The entry's `id`, or null when it has none.
    pub fn entry_id(entry: &serde_json::Value) -> serde_json::Value {
        entry.get("id").cloned().unwrap_or_default()
    }
}

/// Outcome for one batch document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub id: serde_json::Value,
    pub fields: ExtractedFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    pub fn success(id: serde_json::Value, fields: ExtractedFields) -> Self {
        Self {
            id,
            fields,
            error: None,
        }
    }

    pub fn failure(id: serde_json::Value, error: impl ToString) -> Self {
        Self {
            id,
            fields: ExtractedFields::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Ordered batch outcome, one entry per input document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<BatchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_kinds() {
        assert_eq!(FieldName::Price.kind(), FieldKind::Integer);
        assert_eq!(FieldName::Baths.kind(), FieldKind::Decimal);
        assert_eq!(FieldName::LotSize.kind(), FieldKind::Text);
        assert_eq!(FieldName::InfrastructureScore.kind(), FieldKind::Integer);
    }

    #[test]
    fn test_field_name_round_trips_through_str() {
        for field in FieldName::ALL {
            assert_eq!(field.as_str().parse::<FieldName>().unwrap(), *field);
        }
    }

    #[test]
    fn test_insert_rejects_wrong_kind() {
        let mut fields = ExtractedFields::new();
        let err = fields.insert(FieldName::Price, "450,000").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::TypeMismatch {
                field: FieldName::Price,
                expected: FieldKind::Integer
            }
        );
        assert!(fields.is_empty());
    }

    #[test]
    fn test_confidence_map_mirrors_fields() {
        let mut fields = ExtractedFields::new();
        fields.insert(FieldName::Beds, 3i64).unwrap();
        fields.insert(FieldName::InfrastructureScore, 80i64).unwrap();

        let confidence = ConfidenceMap::for_fields(&fields);
        assert_eq!(confidence.keys().collect::<Vec<_>>(), fields.keys().collect::<Vec<_>>());
        assert_eq!(confidence.get(FieldName::Beds), Some(0.9));
        assert_eq!(confidence.get(FieldName::InfrastructureScore), Some(0.7));
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let mut fields = ExtractedFields::new();
        fields.insert(FieldName::YearBuilt, 2010i64).unwrap();
        fields
            .insert(FieldName::Baths, Decimal::new(25, 1))
            .unwrap();
        fields.insert(FieldName::Address, "123 Main St").unwrap();

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"address": "123 Main St", "baths": 2.5, "year_built": 2010})
        );
    }

    #[test]
    fn test_document_type_parsing() {
        assert_eq!("MLS".parse::<DocumentType>().unwrap(), DocumentType::Mls);
        assert_eq!(" deed ".parse::<DocumentType>().unwrap(), DocumentType::Deed);
        assert!("appraisal".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_batch_entry_from_value() {
        let doc = BatchDocument::from_value(&serde_json::json!({
            "id": 4, "text": "Beds: 2", "doc_type": "MLS"
        }))
        .unwrap();
        assert_eq!(doc.id, serde_json::json!(4));
        assert_eq!(doc.text, "Beds: 2");
        assert_eq!(doc.doc_type, DocumentType::Mls);

        let bare = BatchDocument::from_value(&serde_json::json!({"text": null})).unwrap();
        assert_eq!(bare.id, serde_json::Value::Null);
        assert_eq!(bare.text, "");
        assert_eq!(bare.doc_type, DocumentType::General);
    }

    #[test]
    fn test_batch_entry_rejects_unreadable_fields() {
        for entry in [
            serde_json::json!({"id": "x", "text": "Beds: 2", "doc_type": "appraisal"}),
            serde_json::json!({"id": "x", "text": 12}),
            serde_json::json!({"id": "x", "doc_type": ["deed"]}),
            serde_json::json!("Beds: 2"),
        ] {
            assert!(matches!(
                BatchDocument::from_value(&entry),
                Err(ExtractionError::InvalidInput(_))
            ));
        }
        assert_eq!(
            BatchDocument::entry_id(&serde_json::json!({"id": "x", "text": 12})),
            serde_json::json!("x")
        );
    }
}
