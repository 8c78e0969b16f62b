//! Keyword-driven condition grading.

use crate::extraction::registry::ConditionTaxonomy;
use crate::models::fields::ConditionGrade;

/// Grades text spans against a [`ConditionTaxonomy`].
#[derive(Debug, Clone, Default)]
pub struct ConditionAssessor {
    taxonomy: ConditionTaxonomy,
}

impl ConditionAssessor {
    pub fn new(taxonomy: ConditionTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Classify a span. The first rule with a keyword hit decides:
    /// grade keywords in order excellent, good, fair, poor; then defect
    /// words (poor); then wear words (fair); otherwise unknown.
    pub fn assess(&self, span: &str) -> ConditionGrade {
        let span = span.to_lowercase();
        let hit = |keywords: &[String]| keywords.iter().any(|k| span.contains(&k.to_lowercase()));

        for (grade, keywords) in self.taxonomy.graded() {
            if hit(keywords) {
                return grade;
            }
        }

        if hit(&self.taxonomy.issues) {
            ConditionGrade::Poor
        } else if hit(&self.taxonomy.wear) {
            ConditionGrade::Fair
        } else {
            ConditionGrade::Unknown
        }
    }
}

/// Grade a span with the default taxonomy.
pub fn assess_condition(span: &str) -> ConditionGrade {
    ConditionAssessor::default().assess(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_keywords() {
        assert_eq!(assess_condition("Excellent condition"), ConditionGrade::Excellent);
        assert_eq!(assess_condition("Move-in ready"), ConditionGrade::Good);
        assert_eq!(assess_condition("Needs work, old cabinets"), ConditionGrade::Fair);
        assert_eq!(assess_condition("Distressed"), ConditionGrade::Poor);
    }

    #[test]
    fn test_precedence_is_fixed() {
        assert_eq!(
            assess_condition("poor drainage but good shingles"),
            ConditionGrade::Good
        );
        assert_eq!(
            assess_condition("renovated, though some areas are poor"),
            ConditionGrade::Excellent
        );
    }

    #[test]
    fn test_secondary_keyword_sets() {
        assert_eq!(assess_condition("Active leak at chimney"), ConditionGrade::Poor);
        assert_eq!(assess_condition("Visible wear on surfaces"), ConditionGrade::Fair);
        // defect words outrank wear words
        assert_eq!(assess_condition("aged unit, cracked pan"), ConditionGrade::Poor);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(assess_condition("Inspected on site"), ConditionGrade::Unknown);
        assert_eq!(assess_condition(""), ConditionGrade::Unknown);
    }

    #[test]
    fn test_custom_taxonomy_keeps_order() {
        let taxonomy = ConditionTaxonomy {
            excellent: vec!["stellar".to_string()],
            poor: vec!["stellar".to_string()],
            ..ConditionTaxonomy::default()
        };
        let assessor = ConditionAssessor::new(taxonomy);
        assert_eq!(assessor.assess("a stellar roof"), ConditionGrade::Excellent);
    }
}
