//! Ordered pattern catalog and condition keyword taxonomy.
//!
//! The registry is built once and then only read. Each field maps to an
//! ordered list of candidate patterns; evaluation stops at the first
//! pattern that matches, later patterns are fallbacks and never merged.

use std::collections::HashSet;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::error::ExtractionError;
use crate::models::fields::{ConditionGrade, FieldName};

use super::rules::patterns::GENERIC_PATTERNS;

lazy_static! {
    static ref STANDARD_REGISTRY: Arc<PatternRegistry> = Arc::new(
        PatternRegistry::from_table(GENERIC_PATTERNS)
            .expect("built-in pattern table must compile")
    );
}

/// Ordered candidate patterns for one field.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    field: FieldName,
    patterns: Vec<Regex>,
}

impl PatternEntry {
    pub fn field(&self) -> FieldName {
        self.field
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Captured text of the first pattern that matches.
    ///
    /// Uses capture group 1 when the pattern has one, the whole match otherwise.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.patterns.iter().enumerate().find_map(|(i, pattern)| {
            let caps = pattern.captures(text)?;
            trace!("{}: pattern #{} matched", self.field, i);
            caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
        })
    }
}

/// Immutable field-to-patterns catalog.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    entries: Vec<PatternEntry>,
    conditions: ConditionTaxonomy,
}

impl PatternRegistry {
    /// Compile a registry from `(field, ordered patterns)` pairs.
    ///
    /// Patterns are case-insensitive. Fails on an empty pattern list, a
    /// repeated field, or a pattern that does not compile.
    pub fn new<I, P, S>(table: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = (FieldName, P)>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (field, sources) in table {
            if !seen.insert(field) {
                return Err(ExtractionError::InvalidPattern {
                    field: field.to_string(),
                    reason: "field listed more than once".to_string(),
                });
            }

            let patterns = sources
                .into_iter()
                .map(|source| {
                    RegexBuilder::new(source.as_ref())
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| ExtractionError::InvalidPattern {
                            field: field.to_string(),
                            reason: e.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if patterns.is_empty() {
                return Err(ExtractionError::InvalidPattern {
                    field: field.to_string(),
                    reason: "no patterns given".to_string(),
                });
            }

            entries.push(PatternEntry { field, patterns });
        }

        Ok(Self {
            entries,
            conditions: ConditionTaxonomy::default(),
        })
    }

    fn from_table(table: &[(FieldName, &[&str])]) -> Result<Self, ExtractionError> {
        Self::new(table.iter().map(|(field, patterns)| (*field, patterns.iter())))
    }

    /// Shared production registry, compiled on first use.
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD_REGISTRY)
    }

    /// Replace the condition keyword taxonomy.
    pub fn with_conditions(mut self, conditions: ConditionTaxonomy) -> Self {
        self.conditions = conditions;
        self
    }

    /// Entries in declared order.
    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// Patterns declared for a field, if any.
    pub fn patterns(&self, field: FieldName) -> Option<&[Regex]> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.patterns())
    }

    pub fn conditions(&self) -> &ConditionTaxonomy {
        &self.conditions
    }
}

/// Keyword lists used to grade inspected components.
///
/// Grades are always evaluated excellent, good, fair, poor; only the
/// keywords can be substituted, never the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTaxonomy {
    pub excellent: Vec<String>,
    pub good: Vec<String>,
    pub fair: Vec<String>,
    pub poor: Vec<String>,
    /// Specific defects, graded poor when no grade keyword hits.
    pub issues: Vec<String>,
    /// Signs of age, graded fair when nothing else hits.
    pub wear: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for ConditionTaxonomy {
    fn default() -> Self {
        Self {
            excellent: owned(&["excellent", "pristine", "like new", "renovated", "updated"]),
            good: owned(&["good", "well maintained", "move-in ready", "clean"]),
            fair: owned(&["fair", "needs work", "handyman special", "tlc needed"]),
            poor: owned(&["poor", "needs renovation", "fixer", "distressed"]),
            issues: owned(&["leak", "damage", "crack", "broken", "failed"]),
            wear: owned(&["wear", "aged", "older"]),
        }
    }
}

impl ConditionTaxonomy {
    /// Grade keyword lists in evaluation order.
    pub fn graded(&self) -> [(ConditionGrade, &[String]); 4] {
        [
            (ConditionGrade::Excellent, self.excellent.as_slice()),
            (ConditionGrade::Good, self.good.as_slice()),
            (ConditionGrade::Fair, self.fair.as_slice()),
            (ConditionGrade::Poor, self.poor.as_slice()),
        ]
    }
}
