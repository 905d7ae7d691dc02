//! # In-Memory Stores
//!
//! The persistence boundary of the engine: deposited menus, rule
//! definitions, and completed checks with their result sets. All
//! operations are synchronous (`parking_lot` / `dashmap`, never held
//! across `.await` points) and the check store's persist path is a
//! single-lock snapshot-and-swap so readers never observe a check whose
//! counters and results disagree.

use std::collections::HashMap;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;

use mensa_catalog::DishCatalog;
use mensa_core::{
    CheckId, CheckResult, CheckStatus, CheckTally, ContentDigest, MenuCheck, MenuPeriod,
    MensaError, ParsedMenu, RuleId, SiteId,
};
use mensa_rules::ComplianceRule;

// ---------------------------------------------------------------------------
// MenuStore
// ---------------------------------------------------------------------------

/// Deposited parsed menus, one per `(site, period)` key.
///
/// The menu-parsing collaborator deposits here; re-depositing replaces
/// the prior menu wholesale.
#[derive(Debug, Default)]
pub struct MenuStore {
    menus: DashMap<(SiteId, MenuPeriod), ParsedMenu>,
}

impl MenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit a menu, replacing any previous deposit for the key.
    pub fn deposit(&self, menu: ParsedMenu) {
        let key = (menu.site_id(), menu.period());
        let replaced = self.menus.insert(key, menu).is_some();
        tracing::info!(site = %key.0, period = %key.1, replaced, "menu deposited");
    }

    /// Fetch the deposited menu for a key.
    pub fn get(&self, site_id: SiteId, period: MenuPeriod) -> Option<ParsedMenu> {
        self.menus.get(&(site_id, period)).map(|m| m.clone())
    }
}

// ---------------------------------------------------------------------------
// RuleStore
// ---------------------------------------------------------------------------

/// Compliance rule definitions.
///
/// Deactivation is soft (rules keep their history); the weak catalog
/// back-references are nulled through [`RuleStore::deactivate`]'s
/// return so the caller can unlink the catalog in the same breath.
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: DashMap<RuleId, ComplianceRule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a validated rule.
    pub fn insert(&self, rule: ComplianceRule) -> Result<ComplianceRule, MensaError> {
        rule.validate()?;
        self.rules.insert(rule.id, rule.clone());
        Ok(rule)
    }

    /// Fetch a rule by id.
    pub fn get(&self, id: RuleId) -> Option<ComplianceRule> {
        self.rules.get(&id).map(|r| r.clone())
    }

    /// Whether a rule exists.
    pub fn contains(&self, id: RuleId) -> bool {
        self.rules.contains_key(&id)
    }

    /// Replace an existing rule definition after validation.
    pub fn update(&self, rule: ComplianceRule) -> Result<ComplianceRule, MensaError> {
        rule.validate()?;
        if !self.rules.contains_key(&rule.id) {
            return Err(MensaError::NotFound {
                resource: "rule",
                key: rule.id.to_string(),
            });
        }
        self.rules.insert(rule.id, rule.clone());
        Ok(rule)
    }

    /// Deactivate a rule and null every catalog reference to it.
    pub fn deactivate(&self, id: RuleId, catalog: &DishCatalog) -> Result<(), MensaError> {
        let mut rule = self.rules.get_mut(&id).ok_or_else(|| MensaError::NotFound {
            resource: "rule",
            key: id.to_string(),
        })?;
        rule.is_active = false;
        drop(rule);
        catalog.unlink_rule(id);
        Ok(())
    }

    /// List rules sorted by `(priority, name)`, optionally active only.
    pub fn list(&self, active_only: bool) -> Vec<ComplianceRule> {
        let mut rules: Vec<ComplianceRule> = self
            .rules
            .iter()
            .filter(|r| !active_only || r.is_active)
            .map(|r| r.clone())
            .collect();
        rules.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });
        rules
    }
}

// ---------------------------------------------------------------------------
// CheckStore
// ---------------------------------------------------------------------------

/// A check with its immutable result set, swapped as one unit.
#[derive(Debug, Clone)]
struct StoredCheck {
    check: MenuCheck,
    results: Vec<CheckResult>,
}

/// Filters for listing checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckFilter {
    pub site_id: Option<SiteId>,
    pub year: Option<i32>,
    pub limit: Option<usize>,
}

/// Dashboard aggregates across all stored checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceStats {
    pub total_checks: u32,
    pub dishes_above: u32,
    pub dishes_under: u32,
    pub dishes_even: u32,
    pub critical_findings: u32,
}

/// Completed checks and their result sets.
#[derive(Debug, Default)]
pub struct CheckStore {
    inner: RwLock<HashMap<CheckId, StoredCheck>>,
}

impl CheckStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically persist a completed run: tally the results, digest
    /// them, and swap check + results in under one write lock.
    ///
    /// Counters and digest are computed *here*, from the result set
    /// being written — the stored aggregates cannot drift from the
    /// evidence because no other write path exists. A failure leaves
    /// any previously stored state untouched.
    pub fn persist(
        &self,
        mut check: MenuCheck,
        results: Vec<CheckResult>,
    ) -> Result<MenuCheck, MensaError> {
        if let Some(stray) = results.iter().find(|r| r.check_id != check.id) {
            return Err(MensaError::Persistence(format!(
                "result {} belongs to check {}, not {}",
                stray.id, stray.check_id, check.id
            )));
        }
        let tally = CheckTally::from_results(&results);
        let digest = ContentDigest::of(&results)
            .map_err(|e| MensaError::Persistence(format!("result set not canonicalizable: {e}")))?;
        check.complete(tally, digest, Utc::now());

        let mut guard = self.inner.write();
        guard.insert(
            check.id,
            StoredCheck {
                check: check.clone(),
                results,
            },
        );
        Ok(check)
    }

    /// Record a run that failed on unrecoverable input, with no results.
    pub fn record_failed(&self, mut check: MenuCheck) -> MenuCheck {
        check.status = CheckStatus::Failed;
        check.checked_at = Utc::now();
        let mut guard = self.inner.write();
        guard.insert(
            check.id,
            StoredCheck {
                check: check.clone(),
                results: Vec::new(),
            },
        );
        check
    }

    /// Fetch a check by id.
    pub fn get(&self, id: CheckId) -> Option<MenuCheck> {
        self.inner.read().get(&id).map(|s| s.check.clone())
    }

    /// Fetch a check's result set, in evaluation order.
    pub fn results(&self, id: CheckId) -> Option<Vec<CheckResult>> {
        self.inner.read().get(&id).map(|s| s.results.clone())
    }

    /// List checks, newest first.
    pub fn list(&self, filter: CheckFilter) -> Vec<MenuCheck> {
        let guard = self.inner.read();
        let mut checks: Vec<MenuCheck> = guard
            .values()
            .map(|s| &s.check)
            .filter(|c| filter.site_id.map_or(true, |site| c.site_id == site))
            .filter(|c| filter.year.map_or(true, |year| c.period.year() == year))
            .cloned()
            .collect();
        checks.sort_by(|a, b| {
            b.checked_at
                .cmp(&a.checked_at)
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });
        if let Some(limit) = filter.limit {
            checks.truncate(limit);
        }
        checks
    }

    /// Dashboard aggregates over every completed check.
    pub fn stats(&self) -> ComplianceStats {
        let guard = self.inner.read();
        let mut stats = ComplianceStats::default();
        for stored in guard.values() {
            if stored.check.status != CheckStatus::Complete {
                continue;
            }
            stats.total_checks += 1;
            stats.dishes_above += stored.check.dishes_above;
            stats.dishes_under += stored.check.dishes_under;
            stats.dishes_even += stored.check.dishes_even;
            stats.critical_findings += stored.check.critical_findings;
        }
        stats
    }
}
