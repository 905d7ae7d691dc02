//! # Match Criteria
//!
//! What a rule matches against: explicit dish names, a catalog category,
//! or free keywords. The criteria are a closed tagged variant rather
//! than free-form parameters so the evaluator pattern-matches
//! exhaustively — a new criteria kind is a compile error everywhere it
//! is not handled.

use serde::{Deserialize, Serialize};

use mensa_core::{DishCategory, ValidationError};

/// The match criteria of one compliance rule.
///
/// Serialized with an internal `kind` tag, e.g.
/// `{"kind": "keywords", "keywords": ["פרי", "fruit"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchCriteria {
    /// Match specific dish names (compared after normalization).
    Dishes {
        /// The dish names to match, verbatim as configured.
        names: Vec<String>,
    },
    /// Match any dish whose catalog entry carries this category.
    Category {
        /// The catalog category to match.
        category: DishCategory,
    },
    /// Match any dish whose normalized name contains one of these keywords.
    Keywords {
        /// The keywords to search for, verbatim as configured.
        keywords: Vec<String>,
    },
}

impl MatchCriteria {
    /// Validate that the criteria can match anything at all.
    ///
    /// An empty term list or a term that is only whitespace makes the
    /// rule unevaluable; the evaluator records such rules as degraded
    /// results rather than aborting the run.
    pub fn validate(&self, rule_name: &str) -> Result<(), ValidationError> {
        let terms = match self {
            Self::Category { .. } => return Ok(()),
            Self::Dishes { names } => names,
            Self::Keywords { keywords } => keywords,
        };
        if terms.is_empty() {
            return Err(ValidationError::EmptyCriteria(rule_name.to_string()));
        }
        if terms.iter().any(|t| t.trim().is_empty()) {
            return Err(ValidationError::BlankCriteriaTerm(rule_name.to_string()));
        }
        Ok(())
    }

    /// The raw terms to normalize for name matching, if any.
    pub fn terms(&self) -> Option<&[String]> {
        match self {
            Self::Dishes { names } => Some(names),
            Self::Keywords { keywords } => Some(keywords),
            Self::Category { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_criteria_always_validate() {
        let c = MatchCriteria::Category {
            category: DishCategory::Fish,
        };
        assert!(c.validate("Fish twice a week").is_ok());
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let c = MatchCriteria::Keywords { keywords: vec![] };
        let err = c.validate("Fresh Fruit").unwrap_err();
        assert!(matches!(err, ValidationError::EmptyCriteria(_)));
        assert!(format!("{err}").contains("Fresh Fruit"));
    }

    #[test]
    fn blank_dish_name_is_rejected() {
        let c = MatchCriteria::Dishes {
            names: vec!["Shakshuka".to_string(), "   ".to_string()],
        };
        assert!(matches!(
            c.validate("Weekly egg dish").unwrap_err(),
            ValidationError::BlankCriteriaTerm(_)
        ));
    }

    #[test]
    fn terms_exposes_name_lists_only() {
        let dishes = MatchCriteria::Dishes {
            names: vec!["a".into()],
        };
        let category = MatchCriteria::Category {
            category: DishCategory::Soup,
        };
        assert_eq!(dishes.terms().map(<[String]>::len), Some(1));
        assert!(category.terms().is_none());
    }

    #[test]
    fn serde_uses_kind_tag() {
        let c = MatchCriteria::Keywords {
            keywords: vec!["fruit".to_string()],
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["kind"], "keywords");
        assert_eq!(json["keywords"][0], "fruit");

        let cat = MatchCriteria::Category {
            category: DishCategory::SideDish,
        };
        let json = serde_json::to_value(&cat).unwrap();
        assert_eq!(json["kind"], "category");
        assert_eq!(json["category"], "side_dish");
    }

    #[test]
    fn serde_round_trip() {
        let c = MatchCriteria::Dishes {
            names: vec!["מרק עדשים".to_string()],
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: MatchCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
