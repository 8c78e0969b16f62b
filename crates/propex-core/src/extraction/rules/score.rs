//! Infrastructure score: a bounded summary of physical condition.

use chrono::{Datelike, Utc};

use crate::models::fields::{ConditionGrade, ExtractedFields, FieldName};

const BASE_SCORE: i64 = 70;

const CONDITION_FIELDS: [FieldName; 5] = [
    FieldName::RoofCondition,
    FieldName::HvacCondition,
    FieldName::FoundationCondition,
    FieldName::KitchenCondition,
    FieldName::BathroomCondition,
];

/// Computes the derived `infrastructure_score` (0..=100).
#[derive(Debug, Clone, Copy)]
pub struct InfrastructureScorer {
    reference_year: i32,
}

impl InfrastructureScorer {
    /// Scorer measuring building age against `reference_year`.
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Scorer measuring building age against the current calendar year.
    pub fn current() -> Self {
        Self::new(Utc::now().year())
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn score(&self, text: &str, fields: &ExtractedFields) -> i64 {
        let mut score = BASE_SCORE;

        if let Some(year_built) = fields.get(FieldName::YearBuilt).and_then(|v| v.as_integer()) {
            let age = i64::from(self.reference_year) - year_built;
            score += match age {
                a if a < 10 => 20,
                a if a < 20 => 10,
                a if a > 50 => -20,
                _ => 0,
            };
        }

        for field in CONDITION_FIELDS {
            let grade = fields
                .get(field)
                .and_then(|v| v.as_text())
                .and_then(|s| s.parse::<ConditionGrade>().ok());

            score += match grade {
                Some(ConditionGrade::Excellent) => 5,
                Some(ConditionGrade::Good) => 2,
                Some(ConditionGrade::Fair) => -2,
                Some(ConditionGrade::Poor) => -5,
                Some(ConditionGrade::Unknown) | None => 0,
            };
        }

        let lower = text.to_lowercase();
        if lower.contains("updated") || lower.contains("renovated") {
            score += 5;
        }
        if lower.contains("new roof") {
            score += 5;
        }
        if lower.contains("new hvac") {
            score += 5;
        }

        score.clamp(0, 100)
    }
}

impl Default for InfrastructureScorer {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_year(year: i64) -> ExtractedFields {
        let mut fields = ExtractedFields::new();
        fields.insert(FieldName::YearBuilt, year).unwrap();
        fields
    }

    #[test]
    fn test_base_score() {
        let scorer = InfrastructureScorer::new(2025);
        assert_eq!(scorer.score("", &ExtractedFields::new()), 70);
    }

    #[test]
    fn test_age_brackets() {
        let scorer = InfrastructureScorer::new(2025);
        assert_eq!(scorer.score("", &with_year(2020)), 90);
        assert_eq!(scorer.score("", &with_year(2015)), 80);
        assert_eq!(scorer.score("", &with_year(2010)), 80);
        assert_eq!(scorer.score("", &with_year(2005)), 70);
        assert_eq!(scorer.score("", &with_year(1975)), 70);
        assert_eq!(scorer.score("", &with_year(1974)), 50);
    }

    #[test]
    fn test_reference_year_moves_brackets() {
        let fields = with_year(2010);
        assert_eq!(InfrastructureScorer::new(2015).score("", &fields), 90);
        assert_eq!(InfrastructureScorer::new(2040).score("", &fields), 70);
    }

    #[test]
    fn test_conditions_and_keywords() {
        let mut fields = ExtractedFields::new();
        fields.insert(FieldName::RoofCondition, "excellent").unwrap();
        fields.insert(FieldName::KitchenCondition, "poor").unwrap();
        fields.insert(FieldName::HvacCondition, "unknown").unwrap();

        let scorer = InfrastructureScorer::new(2025);
        assert_eq!(scorer.score("", &fields), 70);
        assert_eq!(scorer.score("Renovated 2020. New roof, new HVAC.", &fields), 85);
    }

    #[test]
    fn test_score_is_clamped() {
        let mut fields = with_year(2024);
        for field in CONDITION_FIELDS {
            fields.insert(field, "excellent").unwrap();
        }
        let scorer = InfrastructureScorer::new(2025);
        assert_eq!(scorer.score("updated, new roof, new hvac", &fields), 100);

        let mut fields = with_year(1900);
        for field in CONDITION_FIELDS {
            fields.insert(field, "poor").unwrap();
        }
        assert_eq!(scorer.score("", &fields), 25);
    }
}
