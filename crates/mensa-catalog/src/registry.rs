//! # Dish Catalog Registry
//!
//! The concurrent canonical registry of known dish names. Uniqueness is
//! enforced at the normalized-name level: `resolve_or_insert` is an
//! upsert on a concurrent map, so two evaluations sighting the same
//! dish at the same time still produce exactly one entry — there is no
//! read-then-write race to lose.
//!
//! The registry never merges two entries automatically; deduplication
//! beyond normalization is an explicit operator action outside this
//! crate.

use chrono::Utc;
use dashmap::DashMap;

use mensa_core::{CheckId, DishId, MensaError, RuleId, ValidationError};

use crate::entry::{CatalogStats, CatalogUpdate, DishCatalogEntry, DishFilter};
use crate::normalize::normalize_dish_name;

/// Thread-safe dish catalog keyed by normalized name.
#[derive(Debug, Default)]
pub struct DishCatalog {
    by_key: DashMap<String, DishCatalogEntry>,
    key_by_id: DashMap<DishId, String>,
}

impl DishCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry by raw dish name, inserting a new unreviewed
    /// entry on first sighting.
    ///
    /// Returns a clone of the entry (existing or fresh). Fails only
    /// when the name normalizes to nothing usable.
    pub fn resolve_or_insert(
        &self,
        raw_name: &str,
        source_check_id: Option<CheckId>,
    ) -> Result<DishCatalogEntry, ValidationError> {
        let key = normalize_dish_name(raw_name);
        if key.is_empty() {
            return Err(ValidationError::EmptyDishName(raw_name.to_string()));
        }

        // DashMap::entry serializes concurrent inserts on one key; the
        // or_insert_with closure runs at most once per key.
        let entry = self
            .by_key
            .entry(key.clone())
            .or_insert_with(|| {
                let now = Utc::now();
                let fresh = DishCatalogEntry {
                    id: DishId::new(),
                    dish_name: raw_name.trim().to_string(),
                    normalized_name: key.clone(),
                    category: None,
                    compliance_rule_id: None,
                    approved: false,
                    source_check_id,
                    created_at: now,
                    updated_at: now,
                };
                tracing::debug!(dish = %fresh.dish_name, "new dish sighted, added to catalog");
                fresh
            })
            .clone();
        self.key_by_id.insert(entry.id, key);
        Ok(entry)
    }

    /// Fetch an entry by id.
    pub fn get(&self, id: DishId) -> Option<DishCatalogEntry> {
        let key = self.key_by_id.get(&id)?;
        self.by_key.get(key.value()).map(|e| e.clone())
    }

    /// Fetch an entry by its normalized name.
    pub fn get_by_normalized(&self, normalized: &str) -> Option<DishCatalogEntry> {
        self.by_key.get(normalized).map(|e| e.clone())
    }

    /// Apply a partial update from the review screen.
    ///
    /// The caller is responsible for validating that a supplied rule id
    /// exists (the API layer does this against the rule store before
    /// calling in, preserving the no-dangling-references invariant).
    pub fn apply_update(
        &self,
        id: DishId,
        update: CatalogUpdate,
    ) -> Result<DishCatalogEntry, MensaError> {
        let key = self.key_by_id.get(&id).ok_or_else(|| MensaError::NotFound {
            resource: "dish",
            key: id.to_string(),
        })?;
        let mut entry = self
            .by_key
            .get_mut(key.value())
            .ok_or_else(|| MensaError::NotFound {
                resource: "dish",
                key: id.to_string(),
            })?;
        if let Some(category) = update.category {
            entry.category = Some(category);
        }
        if let Some(rule_id) = update.compliance_rule_id {
            entry.compliance_rule_id = Some(rule_id);
        }
        entry.approved = entry.category.is_some();
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Null out every reference to a deleted rule.
    ///
    /// Weak-reference semantics: catalog entries outlive the rules they
    /// point at. Returns the number of entries touched.
    pub fn unlink_rule(&self, rule_id: RuleId) -> usize {
        let mut touched = 0;
        for mut entry in self.by_key.iter_mut() {
            if entry.compliance_rule_id == Some(rule_id) {
                entry.compliance_rule_id = None;
                entry.updated_at = Utc::now();
                touched += 1;
            }
        }
        if touched > 0 {
            tracing::info!(%rule_id, entries = touched, "unlinked deleted rule from catalog");
        }
        touched
    }

    /// List entries matching a filter, sorted by display name.
    pub fn list(&self, filter: &DishFilter) -> Vec<DishCatalogEntry> {
        let search_key = filter.search.as_deref().map(normalize_dish_name);
        let mut entries: Vec<DishCatalogEntry> = self
            .by_key
            .iter()
            .filter(|e| {
                if let Some(category) = filter.category {
                    if e.category != Some(category) {
                        return false;
                    }
                }
                if filter.unassigned && !e.needs_review() {
                    return false;
                }
                if let Some(ref needle) = search_key {
                    if !needle.is_empty() && !e.normalized_name.contains(needle.as_str()) {
                        return false;
                    }
                }
                true
            })
            .map(|e| e.clone())
            .collect();
        entries.sort_by(|a, b| a.dish_name.cmp(&b.dish_name).then(a.id.to_string().cmp(&b.id.to_string())));
        entries
    }

    /// Aggregates for the dashboard card.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: 0,
            categorized: 0,
            uncategorized: 0,
            rule_linked: 0,
            unlinked: 0,
            by_category: Default::default(),
        };
        for entry in self.by_key.iter() {
            stats.total += 1;
            let bucket = match entry.category {
                Some(category) => {
                    stats.categorized += 1;
                    category.as_str()
                }
                None => {
                    stats.uncategorized += 1;
                    "unassigned"
                }
            };
            *stats.by_category.entry(bucket.to_string()).or_default() += 1;
            if entry.compliance_rule_id.is_some() {
                stats.rule_linked += 1;
            } else {
                stats.unlinked += 1;
            }
        }
        stats
    }

    /// Number of cataloged dishes.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
