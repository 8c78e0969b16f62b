//! Regex patterns for real-estate document extraction.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::fields::FieldName;

/// Generic field table: ordered candidates per field, first match wins.
/// Compiled case-insensitively by the pattern registry.
pub const GENERIC_PATTERNS: &[(FieldName, &[&str])] = &[
    (
        FieldName::Address,
        &[
            r"(?:Property Address|Address|Property|Located at)[:\s]+([^\n]+)",
            r"(\d+\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Way|Boulevard|Blvd)[^\n]*)",
        ],
    ),
    (
        FieldName::Price,
        &[
            r"(?:List Price|Listing Price|Price|Asking Price)[:\s]+\$?([0-9,]+)",
            r"\$([0-9,]+)\s*(?:asking|list|price)",
        ],
    ),
    (
        FieldName::Beds,
        &[
            r"(\d+)\s*(?:Bed|Bedroom|BR|Bdrm)s?",
            r"(?:Bedrooms?|Beds?)[:\s]+(\d+)",
        ],
    ),
    (
        FieldName::Baths,
        &[
            r"(\d+(?:\.\d)?)\s*(?:Bath|Bathroom|BA)s?",
            r"(?:Bathrooms?|Baths?)[:\s]+(\d+(?:\.\d)?)",
        ],
    ),
    (
        FieldName::Sqft,
        &[
            r"(\d+[,\d]*)\s*(?:sq\.?\s*ft\.?|square feet|sqft)",
            r"(?:Square Footage|Living Area|Total Area)[:\s]+(\d+[,\d]*)",
        ],
    ),
    (
        FieldName::YearBuilt,
        &[
            r"(?:Year Built|Built|Construction Year)[:\s]+(\d{4})",
            r"(?:Built in|Constructed)\s+(\d{4})",
        ],
    ),
    (
        FieldName::LotSize,
        &[
            r"(?:Lot Size|Lot)[:\s]+([0-9,]+)\s*(?:sq\.?\s*ft\.?|square feet|acres?)",
            r"([0-9,]+)\s*(?:sq\.?\s*ft\.?|square feet)\s*lot",
        ],
    ),
    (
        FieldName::PropertyType,
        &[
            r"(?:Property Type|Type)[:\s]+([A-Za-z\s]+?)(?:\n|$)",
            r"(Single Family|Condo|Townhouse|Multi-Family|Commercial|Land)",
        ],
    ),
    (
        FieldName::MlsNumber,
        &[
            r"(?:MLS|Listing)\s*#?[:\s]+([A-Z0-9-]+)",
            r"MLS\s*(?:Number|No\.?|#)[:\s]+([A-Z0-9-]+)",
        ],
    ),
];

/// Inspection topics, each scoping one condition field.
pub const INSPECTION_TOPICS: &[(FieldName, &str)] = &[
    (FieldName::RoofCondition, "roof"),
    (FieldName::HvacCondition, r"hvac|heating|cooling|air[\s-]?conditioning"),
    (FieldName::KitchenCondition, "kitchen"),
    (FieldName::BathroomCondition, "bathroom|bath"),
    (FieldName::FoundationCondition, "foundation|structural"),
];

lazy_static! {
    // MLS listing fields
    pub static ref TAX_ASSESSMENT: Regex = Regex::new(
        r"(?i)(?:Tax Assessment|Assessed Value)[:\s]+\$?([0-9,]+)"
    ).unwrap();

    pub static ref HOA_FEE: Regex = Regex::new(
        r"(?i)(?:HOA|HOA Fee|Association Fee)[:\s]+\$?([0-9,]+)"
    ).unwrap();

    pub static ref DAYS_ON_MARKET: Regex = Regex::new(
        r"(?i)(?:Days on Market|DOM)[:\s]+(\d+)"
    ).unwrap();

    // Inspection report fields
    pub static ref ROOF_AGE: Regex = Regex::new(
        r"(?i)(\d+)\s*years?\s*old"
    ).unwrap();

    // A line break followed by a one-word heading and a colon ends a section.
    pub static ref SECTION_BOUNDARY: Regex = Regex::new(
        r"(?i)\n[a-z][a-z]*:"
    ).unwrap();

    // Deed fields
    pub static ref GRANTOR: Regex = Regex::new(
        r"(?i)(?:Grantor|Seller)[:\s]+([^\n]+)"
    ).unwrap();

    pub static ref GRANTEE: Regex = Regex::new(
        r"(?i)(?:Grantee|Buyer)[:\s]+([^\n]+)"
    ).unwrap();

    pub static ref RECORDING_DATE: Regex = Regex::new(
        r"(?i)(?:Recording Date|Recorded)[:\s]+([^\n]+)"
    ).unwrap();

    pub static ref LEGAL_DESCRIPTION: Regex = Regex::new(
        r"(?i)Legal Description[:\s]+([^\n]+(?:\n[^\n]+)*)"
    ).unwrap();

    // Date forms found on recording lines
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    ).unwrap();

    pub static ref DATE_DAY_FIRST: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(\d{4})\b"
    ).unwrap();
}
