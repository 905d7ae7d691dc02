//! # Check Data Contracts
//!
//! The records exchanged between the evaluation engine, the stores, and
//! the dashboard: deposited menus ([`ParsedMenu`]), check runs
//! ([`MenuCheck`]), and per-rule outcomes ([`CheckResult`] with
//! [`RuleEvidence`]).
//!
//! Results are immutable once created and replaced wholesale on re-run.
//! Their identifiers are deterministic (UUIDv5 of the rule id within the
//! check id namespace), so re-running a check over unchanged inputs
//! reproduces byte-identical rows — the property the check-level
//! results digest witnesses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comparison::Comparison;
use crate::digest::ContentDigest;
use crate::error::ValidationError;
use crate::identity::{CheckId, RuleId, SiteId};
use crate::temporal::MenuPeriod;

// ---------------------------------------------------------------------------
// Parsed menus (ingestion contract)
// ---------------------------------------------------------------------------

/// One served day as deposited by the menu-parsing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDay {
    /// The calendar date the menu was served.
    pub date: NaiveDate,
    /// Raw dish names as extracted from the source document.
    pub dishes: Vec<String>,
}

/// A validated month of daily menus for one site.
///
/// Construction enforces the ingestion contract: every day falls inside
/// the period, no date appears twice, and days are sorted ascending.
/// Downstream code can rely on those properties without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMenu {
    site_id: SiteId,
    period: MenuPeriod,
    days: Vec<MenuDay>,
}

impl ParsedMenu {
    /// Validate and normalize a menu deposit.
    pub fn new(
        site_id: SiteId,
        period: MenuPeriod,
        mut days: Vec<MenuDay>,
    ) -> Result<Self, ValidationError> {
        for day in &days {
            if !period.contains(day.date) {
                return Err(ValidationError::DayOutsidePeriod {
                    date: day.date,
                    period: period.to_string(),
                });
            }
        }
        days.sort_by_key(|d| d.date);
        if let Some(dup) = days.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(ValidationError::DuplicateDay(dup[0].date));
        }
        for day in &mut days {
            for dish in &mut day.dishes {
                *dish = dish.trim().to_string();
            }
            day.dishes.retain(|d| !d.is_empty());
        }
        Ok(Self {
            site_id,
            period,
            days,
        })
    }

    /// The site this menu belongs to.
    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    /// The month this menu covers.
    pub fn period(&self) -> MenuPeriod {
        self.period
    }

    /// The served days, sorted ascending by date.
    pub fn days(&self) -> &[MenuDay] {
        &self.days
    }

    /// The dates the site served food, sorted ascending.
    pub fn served_dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|d| d.date).collect()
    }
}

// ---------------------------------------------------------------------------
// Evidence & results
// ---------------------------------------------------------------------------

/// Severity tier of a rule's finding, derived from the rule's priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Priority 0–1 rules: an under-served outcome is a critical finding.
    Critical,
    /// Lower-priority rules: deviations are reported as warnings.
    Warning,
}

/// Day-level proof backing one rule's comparison outcome.
///
/// Both day sequences are sorted ascending and populated per a fixed
/// policy: `under` fills both, `above` fills `found_on_days` only,
/// `even` leaves both empty. Degraded results (malformed rule) carry
/// `expected_count = None`, `warning = true`, and a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEvidence {
    /// Expected serving days for the period; `None` only for degraded results.
    pub expected_count: Option<u32>,
    /// Days on which the rule was satisfied.
    pub actual_count: u32,
    /// Outcome of the expected-vs-actual comparison.
    pub comparison: Comparison,
    /// Days contributing to `actual_count`, ascending.
    pub found_on_days: Vec<NaiveDate>,
    /// Representative days the rule required a serving that did not happen, ascending.
    pub missing_on_days: Vec<NaiveDate>,
    /// Set when the rule could not be evaluated and the result is degraded.
    #[serde(default)]
    pub warning: bool,
    /// Degradation reason, present only when `warning` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome of evaluating one rule within one check run.
///
/// Never mutated after creation; a re-run replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Deterministic identifier; see [`CheckResult::id_for`].
    pub id: Uuid,
    /// The check run this result belongs to.
    pub check_id: CheckId,
    /// The rule that was evaluated.
    pub rule_id: RuleId,
    /// Rule name, denormalized for display.
    pub rule_name: String,
    /// Rule display grouping (e.g. "Menu Variety"), if any.
    pub rule_category: Option<String>,
    /// Severity tier the rule carries.
    pub severity: Severity,
    /// Day-level evidence for the comparison outcome.
    pub evidence: RuleEvidence,
}

impl CheckResult {
    /// Deterministic result identifier: UUIDv5 of the rule id within the
    /// check id namespace. Identical `(check_id, rule_id)` pairs always
    /// produce the same id, making re-runs reproducible row for row.
    pub fn id_for(check_id: CheckId, rule_id: RuleId) -> Uuid {
        Uuid::new_v5(check_id.as_uuid(), rule_id.as_uuid().as_bytes())
    }

    /// Whether this result counts as a critical finding: a critical-tier
    /// rule that was under-served.
    pub fn is_critical_finding(&self) -> bool {
        self.severity == Severity::Critical && self.evidence.comparison == Comparison::Under
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Lifecycle state of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    /// Evaluation in progress; results are not yet visible.
    Running,
    /// Evaluation finished; results are visible and consistent.
    Complete,
    /// Evaluation failed on unrecoverable input error.
    Failed,
}

impl CheckStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Complete => "COMPLETE",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate counters over one check's result set.
///
/// Derived exclusively through [`CheckTally::from_results`]; the store
/// applies the tally at persist time, so stored counters can never
/// drift from the evidence they summarize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckTally {
    pub above: u32,
    pub under: u32,
    pub even: u32,
    pub critical: u32,
}

impl CheckTally {
    /// Count comparisons and critical findings across a result set.
    pub fn from_results(results: &[CheckResult]) -> Self {
        let mut tally = Self::default();
        for result in results {
            match result.evidence.comparison {
                Comparison::Above => tally.above += 1,
                Comparison::Under => tally.under += 1,
                Comparison::Even => tally.even += 1,
            }
            if result.is_critical_finding() {
                tally.critical += 1;
            }
        }
        tally
    }

    /// Total results covered by this tally.
    pub fn total(&self) -> u32 {
        self.above + self.under + self.even
    }
}

/// One evaluation run of all rules against one site's menu for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCheck {
    pub id: CheckId,
    pub site_id: SiteId,
    pub period: MenuPeriod,
    pub status: CheckStatus,
    /// When the run (or the most recent re-run) completed.
    pub checked_at: DateTime<Utc>,
    /// Rules served more often than expected.
    pub dishes_above: u32,
    /// Rules served less often than expected.
    pub dishes_under: u32,
    /// Rules served exactly as expected.
    pub dishes_even: u32,
    /// Under-served critical-tier rules.
    pub critical_findings: u32,
    /// SHA-256 digest of the canonicalized result set; the idempotence witness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_digest: Option<ContentDigest>,
}

impl MenuCheck {
    /// Create a new check in the `Running` state with zeroed counters.
    pub fn begin(site_id: SiteId, period: MenuPeriod) -> Self {
        Self {
            id: CheckId::new(),
            site_id,
            period,
            status: CheckStatus::Running,
            checked_at: Utc::now(),
            dishes_above: 0,
            dishes_under: 0,
            dishes_even: 0,
            critical_findings: 0,
            results_digest: None,
        }
    }

    /// Apply a result tally, marking the check complete.
    pub fn complete(&mut self, tally: CheckTally, digest: ContentDigest, at: DateTime<Utc>) {
        self.status = CheckStatus::Complete;
        self.checked_at = at;
        self.dishes_above = tally.above;
        self.dishes_under = tally.under;
        self.dishes_even = tally.even;
        self.critical_findings = tally.critical;
        self.results_digest = Some(digest);
    }

    /// Sum of the per-comparison counters.
    pub fn result_count(&self) -> u32 {
        self.dishes_above + self.dishes_under + self.dishes_even
    }
}
