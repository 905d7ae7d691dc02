//! # Catalog Entry Types
//!
//! The [`DishCatalogEntry`] record plus the filter and stats shapes the
//! catalog review screens consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use mensa_core::{CheckId, DishCategory, DishId, RuleId};

/// A canonical, deduplicated dish name.
///
/// Entries are created automatically on first sighting during a check
/// run and then categorized/linked manually from the review screen.
/// The rule link is a weak back-reference: deleting a rule nulls it,
/// never cascades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishCatalogEntry {
    pub id: DishId,
    /// Display form: trimmed raw name, original script preserved.
    pub dish_name: String,
    /// Canonical lookup key; unique across the catalog.
    pub normalized_name: String,
    pub category: Option<DishCategory>,
    pub compliance_rule_id: Option<RuleId>,
    /// Set once a reviewer has confirmed the categorization.
    pub approved: bool,
    /// The check that first sighted this dish, if auto-created.
    pub source_check_id: Option<CheckId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DishCatalogEntry {
    /// Whether the entry still needs reviewer attention.
    pub fn needs_review(&self) -> bool {
        self.category.is_none() || self.compliance_rule_id.is_none()
    }
}

/// Filters for the catalog list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DishFilter {
    /// Only entries with this category.
    pub category: Option<DishCategory>,
    /// Only entries missing a category or a rule link.
    #[serde(default)]
    pub unassigned: bool,
    /// Substring match on the normalized dish name.
    pub search: Option<String>,
}

/// Partial update applied from the review screen.
///
/// Absent fields leave the entry unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogUpdate {
    pub category: Option<DishCategory>,
    pub compliance_rule_id: Option<RuleId>,
}

/// Aggregates for the catalog dashboard card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: u32,
    pub categorized: u32,
    pub uncategorized: u32,
    pub rule_linked: u32,
    pub unlinked: u32,
    /// Entry count per category wire name; uncategorized entries count
    /// under `"unassigned"`. Sorted map for stable serialization.
    pub by_category: BTreeMap<String, u32>,
}
