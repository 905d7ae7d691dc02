//! # Compliance Evaluator
//!
//! Runs every active rule against a resolved menu and produces the
//! check's result set. Rule evaluations share no mutable state — each
//! is a pure function of the resolved days and the rule snapshot — so
//! the loop could fan out across a worker pool; it stays a deterministic
//! sequential loop here because a month of menus evaluates in
//! microseconds and ordering must be reproducible either way.
//!
//! Failure policy: a rule whose definition fails validation yields a
//! degraded result (flagged, `Even`, no expectation) and never aborts
//! the run. Only data-integrity violations — a catalog entry linking to
//! a rule that does not exist — abort, because they indicate store
//! corruption rather than one bad rule.

use std::collections::HashSet;

use mensa_core::{CheckId, CheckResult, MensaError, RuleId};
use mensa_rules::ComplianceRule;

use crate::evidence::{build_evidence, degraded_evidence};
use crate::matcher::{day_matches_rule, CompiledCriteria, ResolvedDay};

/// Evaluate all rules against a resolved menu.
///
/// Rules are processed in `(priority, name, id)` order and inactive
/// rules are skipped; the returned results keep that order.
pub fn evaluate_rules(
    check_id: CheckId,
    days: &[ResolvedDay],
    rules: &[ComplianceRule],
) -> Vec<CheckResult> {
    let mut ordered: Vec<&ComplianceRule> = rules.iter().filter(|r| r.is_active).collect();
    ordered.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
    });

    ordered
        .into_iter()
        .map(|rule| evaluate_rule(check_id, days, rule))
        .collect()
}

/// Evaluate a single rule.
fn evaluate_rule(check_id: CheckId, days: &[ResolvedDay], rule: &ComplianceRule) -> CheckResult {
    let evidence = match rule.validate() {
        Err(err) => {
            tracing::warn!(rule = %rule.name, %err, "rule definition invalid, recording degraded result");
            degraded_evidence(err.to_string())
        }
        Ok(()) => {
            let criteria = CompiledCriteria::compile(&rule.match_criteria);
            let day_matches: Vec<_> = days
                .iter()
                .map(|day| (day.date, day_matches_rule(day, rule.id, &criteria)))
                .collect();
            let served: Vec<_> = days.iter().map(|d| d.date).collect();
            build_evidence(rule.expected_count(&served), &day_matches)
        }
    };

    CheckResult {
        id: CheckResult::id_for(check_id, rule.id),
        check_id,
        rule_id: rule.id,
        rule_name: rule.name.clone(),
        rule_category: rule.category.clone(),
        severity: rule.severity(),
        evidence,
    }
}

/// Verify that every catalog link sighted in the menu points at an
/// existing rule.
///
/// A dangling link is a data-integrity error: the catalog is supposed
/// to be unlinked when a rule is deleted, so encountering one means the
/// stores disagree and the run must not proceed on silent nulls.
pub fn verify_rule_links(
    days: &[ResolvedDay],
    rules: &[ComplianceRule],
) -> Result<(), MensaError> {
    let known: HashSet<RuleId> = rules.iter().map(|r| r.id).collect();
    for day in days {
        for dish in &day.dishes {
            if let Some(link) = dish.rule_link {
                if !known.contains(&link) {
                    return Err(MensaError::Integrity(format!(
                        "dish {} links to unknown rule {}",
                        dish.dish_id, link
                    )));
                }
            }
        }
    }
    Ok(())
}
