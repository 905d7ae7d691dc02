//! # Check Orchestrator
//!
//! Ties matcher, evaluator, evidence, and stores together for the
//! "run check" and "re-run check" requests.
//!
//! Concurrency contract: at most one evaluation per `(site, period)`
//! key at a time. The in-flight key registry rejects a second caller
//! with a conflict rather than queueing — each run is triggered
//! synchronously by an external request and completes or fails within
//! it, so the caller owns retry policy. An RAII guard releases the key
//! on every exit path.
//!
//! Re-run is snapshot-and-swap: the full new result set is built in
//! memory and swapped in under the check store's write lock, so readers
//! never observe a mix of old and new rows.

use std::sync::Arc;

use dashmap::DashMap;

use mensa_catalog::DishCatalog;
use mensa_core::{CheckId, CheckResult, MenuCheck, MenuPeriod, MensaError, ParsedMenu, SiteId};

use crate::evaluator::{evaluate_rules, verify_rule_links};
use crate::matcher::DishMatcher;
use crate::stores::{CheckStore, MenuStore, RuleStore};

type RunKey = (SiteId, MenuPeriod);

/// Coordinates one evaluation run end to end.
pub struct CheckOrchestrator {
    menus: Arc<MenuStore>,
    rules: Arc<RuleStore>,
    catalog: Arc<DishCatalog>,
    checks: Arc<CheckStore>,
    running: DashMap<RunKey, ()>,
}

/// Releases the in-flight key when an evaluation finishes, errors
/// included.
struct RunGuard<'a> {
    running: &'a DashMap<RunKey, ()>,
    key: RunKey,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.remove(&self.key);
    }
}

impl CheckOrchestrator {
    pub fn new(
        menus: Arc<MenuStore>,
        rules: Arc<RuleStore>,
        catalog: Arc<DishCatalog>,
        checks: Arc<CheckStore>,
    ) -> Self {
        Self {
            menus,
            rules,
            catalog,
            checks,
            running: DashMap::new(),
        }
    }

    /// Claim the run key, or fail with a conflict if a run is in flight.
    fn acquire(&self, key: RunKey) -> Result<RunGuard<'_>, MensaError> {
        match self.running.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(MensaError::Conflict(format!("{}/{}", key.0, key.1)))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(());
                Ok(RunGuard {
                    running: &self.running,
                    key,
                })
            }
        }
    }

    /// Match and evaluate one menu under a fresh or re-used check id.
    fn execute(&self, check_id: CheckId, menu: &ParsedMenu) -> Result<Vec<CheckResult>, MensaError> {
        let matcher = DishMatcher::new(&self.catalog);
        let days = matcher.resolve_menu(menu, check_id);
        let rules = self.rules.list(false);
        verify_rule_links(&days, &rules)?;
        Ok(evaluate_rules(check_id, &days, &rules))
    }

    /// Run a fresh check for a site and month.
    ///
    /// Fails with `NotFound` when no menu has been deposited for the
    /// period and with `Conflict` when a run is already in flight for
    /// the key. An evaluation failure after the check was opened is
    /// recorded as a `Failed` check with no results.
    pub fn run_check(&self, site_id: SiteId, period: MenuPeriod) -> Result<MenuCheck, MensaError> {
        let _guard = self.acquire((site_id, period))?;
        let menu = self
            .menus
            .get(site_id, period)
            .ok_or_else(|| MensaError::NotFound {
                resource: "menu",
                key: format!("{site_id}/{period}"),
            })?;

        let check = MenuCheck::begin(site_id, period);
        let check_id = check.id;
        tracing::info!(%check_id, site = %site_id, %period, days = menu.days().len(), "running compliance check");

        match self
            .execute(check_id, &menu)
            .and_then(|results| self.checks.persist(check.clone(), results))
        {
            Ok(completed) => {
                tracing::info!(
                    %check_id,
                    above = completed.dishes_above,
                    under = completed.dishes_under,
                    even = completed.dishes_even,
                    critical = completed.critical_findings,
                    "compliance check complete"
                );
                Ok(completed)
            }
            Err(err) => {
                tracing::error!(%check_id, %err, "compliance check failed");
                self.checks.record_failed(check);
                Err(err)
            }
        }
    }

    /// Re-run an existing check in place.
    ///
    /// Re-reads current rule definitions and menu data, then atomically
    /// replaces the check's results under the same id. On failure the
    /// prior results remain visible and untouched.
    pub fn rerun_check(&self, check_id: CheckId) -> Result<MenuCheck, MensaError> {
        let prior = self.checks.get(check_id).ok_or_else(|| MensaError::NotFound {
            resource: "check",
            key: check_id.to_string(),
        })?;
        let _guard = self.acquire((prior.site_id, prior.period))?;
        let menu = self
            .menus
            .get(prior.site_id, prior.period)
            .ok_or_else(|| MensaError::NotFound {
                resource: "menu",
                key: format!("{}/{}", prior.site_id, prior.period),
            })?;

        tracing::info!(%check_id, site = %prior.site_id, period = %prior.period, "re-running compliance check");
        let results = self.execute(check_id, &menu)?;
        // Rebuild the check from its identity; persist() recomputes
        // status, counters, digest, and checked_at from the new set.
        let rebuilt = MenuCheck {
            id: prior.id,
            site_id: prior.site_id,
            period: prior.period,
            ..MenuCheck::begin(prior.site_id, prior.period)
        };
        self.checks.persist(rebuilt, results)
    }
}
