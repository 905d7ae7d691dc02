//! # Dish Categories
//!
//! The closed set of categories a catalog entry can be assigned to.
//! The catalog review screens drive assignment from a dropdown, so the
//! set is an enum rather than free-form strings: an unknown category is
//! rejected at the wire and every `match` over categories is exhaustive.
//!
//! Labels are bilingual (English / Hebrew) because the consuming
//! dashboard renders right-to-left dish names next to them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Category of a cataloged dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishCategory {
    Soup,
    ProteinBeef,
    ProteinChicken,
    Schnitzel,
    ChickenBreast,
    Fish,
    Vegan,
    Carbs,
    Legumes,
    Salads,
    Desserts,
    SideDish,
    Other,
}

impl DishCategory {
    /// All categories, in dropdown display order.
    pub fn all() -> &'static [DishCategory] {
        &[
            Self::Soup,
            Self::ProteinBeef,
            Self::ProteinChicken,
            Self::Schnitzel,
            Self::ChickenBreast,
            Self::Fish,
            Self::Vegan,
            Self::Carbs,
            Self::Legumes,
            Self::Salads,
            Self::Desserts,
            Self::SideDish,
            Self::Other,
        ]
    }

    /// Wire identifier (snake_case, matches the serde form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soup => "soup",
            Self::ProteinBeef => "protein_beef",
            Self::ProteinChicken => "protein_chicken",
            Self::Schnitzel => "schnitzel",
            Self::ChickenBreast => "chicken_breast",
            Self::Fish => "fish",
            Self::Vegan => "vegan",
            Self::Carbs => "carbs",
            Self::Legumes => "legumes",
            Self::Salads => "salads",
            Self::Desserts => "desserts",
            Self::SideDish => "side_dish",
            Self::Other => "other",
        }
    }

    /// Bilingual display label for the category dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Soup => "Soup / מרק",
            Self::ProteinBeef => "Protein - Beef / בקר",
            Self::ProteinChicken => "Protein - Chicken / עוף",
            Self::Schnitzel => "Schnitzel / שניצל",
            Self::ChickenBreast => "Chicken Breast / חזה עוף",
            Self::Fish => "Fish / דג",
            Self::Vegan => "Vegan / טבעוני",
            Self::Carbs => "Carbs / פחמימות",
            Self::Legumes => "Legumes / קטניות",
            Self::Salads => "Salads / סלטים",
            Self::Desserts => "Desserts / קינוחים",
            Self::SideDish => "Side Dish / תוספות",
            Self::Other => "Other / אחר",
        }
    }
}

impl std::fmt::Display for DishCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DishCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn all_lists_thirteen_categories() {
        assert_eq!(DishCategory::all().len(), 13);
    }

    #[test]
    fn as_str_round_trips_from_str() {
        for &cat in DishCategory::all() {
            assert_eq!(DishCategory::from_str(cat.as_str()).unwrap(), cat);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = DishCategory::from_str("pizza").unwrap_err();
        assert!(format!("{err}").contains("pizza"));
    }

    #[test]
    fn serde_matches_as_str() {
        for &cat in DishCategory::all() {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.as_str()));
        }
    }

    #[test]
    fn labels_are_bilingual() {
        // Every label carries both a Latin and a Hebrew part.
        for &cat in DishCategory::all() {
            let label = cat.label();
            assert!(label.contains('/'), "label missing separator: {label}");
        }
    }
}
