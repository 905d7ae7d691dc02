//! # Dish Matcher
//!
//! Resolves a parsed menu against the dish catalog and decides, per day
//! and per rule, whether the rule was satisfied.
//!
//! Matching precedence per day (first hit wins, a day is counted at
//! most once per rule):
//!
//! 1. **Catalog link** — a dish on the day whose catalog entry links to
//!    the rule. Reviewer-confirmed, so it always outranks guessing.
//! 2. **Category** — for category criteria, a dish whose catalog entry
//!    carries the rule's category.
//! 3. **Name/keyword** — normalized-name equality for dish-list
//!    criteria, normalized substring for keyword criteria.

use chrono::NaiveDate;

use mensa_catalog::{normalize_dish_name, DishCatalog};
use mensa_core::{CheckId, DishCategory, DishId, ParsedMenu, RuleId};
use mensa_rules::MatchCriteria;

/// One dish occurrence resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDish {
    pub dish_id: DishId,
    pub normalized_name: String,
    pub category: Option<DishCategory>,
    pub rule_link: Option<RuleId>,
}

/// One served day with its dishes resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDay {
    pub date: NaiveDate,
    pub dishes: Vec<ResolvedDish>,
}

/// Match criteria with terms pre-normalized for day matching.
///
/// Compiled once per rule per run so per-day matching never re-normalizes.
#[derive(Debug, Clone)]
pub enum CompiledCriteria {
    /// Exact normalized-name matches.
    Dishes(Vec<String>),
    /// Catalog category match.
    Category(DishCategory),
    /// Normalized substring matches.
    Keywords(Vec<String>),
}

impl CompiledCriteria {
    /// Normalize a rule's criteria terms.
    pub fn compile(criteria: &MatchCriteria) -> Self {
        match criteria {
            MatchCriteria::Category { category } => Self::Category(*category),
            MatchCriteria::Dishes { names } => Self::Dishes(normalize_terms(names)),
            MatchCriteria::Keywords { keywords } => Self::Keywords(normalize_terms(keywords)),
        }
    }
}

fn normalize_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| normalize_dish_name(t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Maps raw dish names onto catalog entries, creating entries for
/// unseen names as a side effect of evaluation.
pub struct DishMatcher<'a> {
    catalog: &'a DishCatalog,
}

impl<'a> DishMatcher<'a> {
    pub fn new(catalog: &'a DishCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve every dish of every served day against the catalog.
    ///
    /// Unseen names are inserted with `source_check_id = check_id`.
    /// Names that normalize to nothing are skipped with a log line —
    /// they can never match a rule and must not pollute the catalog.
    pub fn resolve_menu(&self, menu: &ParsedMenu, check_id: CheckId) -> Vec<ResolvedDay> {
        menu.days()
            .iter()
            .map(|day| {
                let dishes = day
                    .dishes
                    .iter()
                    .filter_map(|raw| {
                        match self.catalog.resolve_or_insert(raw, Some(check_id)) {
                            Ok(entry) => Some(ResolvedDish {
                                dish_id: entry.id,
                                normalized_name: entry.normalized_name,
                                category: entry.category,
                                rule_link: entry.compliance_rule_id,
                            }),
                            Err(err) => {
                                tracing::warn!(raw, %err, "skipping unusable dish name");
                                None
                            }
                        }
                    })
                    .collect();
                ResolvedDay {
                    date: day.date,
                    dishes,
                }
            })
            .collect()
    }
}

/// Whether a day satisfies a rule, per the matching precedence.
pub fn day_matches_rule(day: &ResolvedDay, rule_id: RuleId, criteria: &CompiledCriteria) -> bool {
    // 1. Reviewer-confirmed catalog link.
    if day.dishes.iter().any(|d| d.rule_link == Some(rule_id)) {
        return true;
    }
    // 2./3. Criteria-driven match.
    match criteria {
        CompiledCriteria::Category(category) => {
            day.dishes.iter().any(|d| d.category == Some(*category))
        }
        CompiledCriteria::Dishes(names) => day
            .dishes
            .iter()
            .any(|d| names.iter().any(|n| *n == d.normalized_name)),
        CompiledCriteria::Keywords(keywords) => day
            .dishes
            .iter()
            .any(|d| keywords.iter().any(|k| d.normalized_name.contains(k.as_str()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensa_catalog::CatalogUpdate;
    use mensa_core::{MenuDay, MenuPeriod, SiteId};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn menu(days: Vec<(u32, Vec<&str>)>) -> ParsedMenu {
        ParsedMenu::new(
            SiteId::new(),
            MenuPeriod::new(2026, 1).unwrap(),
            days.into_iter()
                .map(|(d, dishes)| MenuDay {
                    date: date(d),
                    dishes: dishes.into_iter().map(String::from).collect(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn resolved(dishes: Vec<ResolvedDish>) -> ResolvedDay {
        ResolvedDay {
            date: date(5),
            dishes,
        }
    }

    fn dish(name: &str, category: Option<DishCategory>, link: Option<RuleId>) -> ResolvedDish {
        ResolvedDish {
            dish_id: DishId::new(),
            normalized_name: normalize_dish_name(name),
            category,
            rule_link: link,
        }
    }

    #[test]
    fn resolve_menu_catalogs_unseen_dishes_once() {
        let catalog = DishCatalog::new();
        let check = CheckId::new();
        let matcher = DishMatcher::new(&catalog);
        let days = matcher.resolve_menu(
            &menu(vec![
                (5, vec!["Shakshuka", "Fresh Fruit"]),
                (6, vec!["Shakshuka"]),
            ]),
            check,
        );
        assert_eq!(days.len(), 2);
        assert_eq!(catalog.len(), 2);
        // Same dish on both days resolves to the same entry.
        assert_eq!(days[0].dishes[0].dish_id, days[1].dishes[0].dish_id);
        let entry = catalog.get(days[0].dishes[0].dish_id).unwrap();
        assert_eq!(entry.source_check_id, Some(check));
    }

    #[test]
    fn resolve_menu_skips_unusable_names() {
        let catalog = DishCatalog::new();
        let matcher = DishMatcher::new(&catalog);
        let days = matcher.resolve_menu(&menu(vec![(5, vec!["***", "Soup"])]), CheckId::new());
        assert_eq!(days[0].dishes.len(), 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn resolve_menu_carries_existing_assignments() {
        let catalog = DishCatalog::new();
        let rule = RuleId::new();
        let entry = catalog.resolve_or_insert("מרק עדשים", None).unwrap();
        catalog
            .apply_update(
                entry.id,
                CatalogUpdate {
                    category: Some(DishCategory::Soup),
                    compliance_rule_id: Some(rule),
                },
            )
            .unwrap();
        let matcher = DishMatcher::new(&catalog);
        let days = matcher.resolve_menu(&menu(vec![(5, vec!["מרק עדשים"])]), CheckId::new());
        assert_eq!(days[0].dishes[0].category, Some(DishCategory::Soup));
        assert_eq!(days[0].dishes[0].rule_link, Some(rule));
    }

    #[test]
    fn catalog_link_outranks_criteria() {
        let rule = RuleId::new();
        // The dish name matches nothing in the criteria, but the
        // reviewer linked it to the rule.
        let day = resolved(vec![dish("Custom House Special", None, Some(rule))]);
        let criteria = CompiledCriteria::Keywords(vec!["fruit".to_string()]);
        assert!(day_matches_rule(&day, rule, &criteria));
    }

    #[test]
    fn link_to_a_different_rule_does_not_match() {
        let rule = RuleId::new();
        let day = resolved(vec![dish("Something", None, Some(RuleId::new()))]);
        let criteria = CompiledCriteria::Keywords(vec!["fruit".to_string()]);
        assert!(!day_matches_rule(&day, rule, &criteria));
    }

    #[test]
    fn category_criteria_match_catalog_category() {
        let rule = RuleId::new();
        let day = resolved(vec![
            dish("מרק עדשים", Some(DishCategory::Soup), None),
            dish("Rice", Some(DishCategory::Carbs), None),
        ]);
        assert!(day_matches_rule(
            &day,
            rule,
            &CompiledCriteria::Category(DishCategory::Soup)
        ));
        assert!(!day_matches_rule(
            &day,
            rule,
            &CompiledCriteria::Category(DishCategory::Fish)
        ));
    }

    #[test]
    fn dish_criteria_require_exact_normalized_name() {
        let rule = RuleId::new();
        let day = resolved(vec![dish("Fresh Fruit", None, None)]);
        let compiled = CompiledCriteria::compile(&MatchCriteria::Dishes {
            names: vec!["FRESH-FRUIT".to_string()],
        });
        assert!(day_matches_rule(&day, rule, &compiled));
        let other = CompiledCriteria::compile(&MatchCriteria::Dishes {
            names: vec!["Fruit".to_string()],
        });
        assert!(!day_matches_rule(&day, rule, &other));
    }

    #[test]
    fn keyword_criteria_match_substrings() {
        let rule = RuleId::new();
        let day = resolved(vec![dish("סלט פירות טריים", None, None)]);
        let compiled = CompiledCriteria::compile(&MatchCriteria::Keywords {
            keywords: vec!["פירות".to_string()],
        });
        assert!(day_matches_rule(&day, rule, &compiled));
    }

    #[test]
    fn empty_day_matches_nothing() {
        let rule = RuleId::new();
        let day = resolved(vec![]);
        assert!(!day_matches_rule(
            &day,
            rule,
            &CompiledCriteria::Keywords(vec!["x".to_string()])
        ));
        assert!(!day_matches_rule(
            &day,
            rule,
            &CompiledCriteria::Category(DishCategory::Soup)
        ));
    }

    #[test]
    fn compile_drops_terms_that_normalize_away() {
        let compiled = CompiledCriteria::compile(&MatchCriteria::Keywords {
            keywords: vec!["fruit".to_string(), "***".to_string()],
        });
        match compiled {
            CompiledCriteria::Keywords(kws) => assert_eq!(kws, vec!["fruit".to_string()]),
            other => panic!("expected keywords, got {other:?}"),
        }
    }
}
