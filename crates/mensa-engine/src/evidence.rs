//! # Evidence Builder
//!
//! Pure transformation from a rule's per-day match vector into
//! [`RuleEvidence`]. No wall-clock reads, no randomness, no map
//! iteration order: identical inputs yield identical evidence, which is
//! what makes re-runs byte-identical.
//!
//! Population policy (fixed, tested):
//! - `Under`: `found_on_days` holds every matching day; `missing_on_days`
//!   holds the first `expected − actual` non-matching days as
//!   representative misses.
//! - `Above`: `found_on_days` only, for display.
//! - `Even`: both sequences empty.

use chrono::NaiveDate;

use mensa_core::{Comparison, RuleEvidence};

/// Build evidence from an expected count and an ascending per-day match
/// vector.
pub fn build_evidence(expected: u32, day_matches: &[(NaiveDate, bool)]) -> RuleEvidence {
    debug_assert!(
        day_matches.windows(2).all(|w| w[0].0 < w[1].0),
        "day matches must be strictly ascending"
    );

    let found: Vec<NaiveDate> = day_matches
        .iter()
        .filter(|(_, matched)| *matched)
        .map(|(date, _)| *date)
        .collect();
    let actual = found.len() as u32;
    let comparison = Comparison::classify(expected, actual);

    let (found_on_days, missing_on_days) = match comparison {
        Comparison::Even => (Vec::new(), Vec::new()),
        Comparison::Above => (found, Vec::new()),
        Comparison::Under => {
            let deficit = (expected - actual) as usize;
            let missing: Vec<NaiveDate> = day_matches
                .iter()
                .filter(|(_, matched)| !*matched)
                .map(|(date, _)| *date)
                .take(deficit)
                .collect();
            (found, missing)
        }
    };

    RuleEvidence {
        expected_count: Some(expected),
        actual_count: actual,
        comparison,
        found_on_days,
        missing_on_days,
        warning: false,
        note: None,
    }
}

/// Build the degraded evidence recorded for a rule that could not be
/// evaluated. Classified `Even` with no expectation so it never skews
/// the above/under counters, flagged so the dashboard can badge it.
pub fn degraded_evidence(reason: String) -> RuleEvidence {
    RuleEvidence {
        expected_count: None,
        actual_count: 0,
        comparison: Comparison::Even,
        found_on_days: Vec::new(),
        missing_on_days: Vec::new(),
        warning: true,
        note: Some(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn days(matches: &[(u32, bool)]) -> Vec<(NaiveDate, bool)> {
        matches.iter().map(|&(d, m)| (date(d), m)).collect()
    }

    #[test]
    fn under_populates_found_and_representative_missing() {
        // Expected 4, matched on days 2 and 5 → deficit 2.
        let evidence = build_evidence(
            4,
            &days(&[(1, false), (2, true), (3, false), (4, false), (5, true)]),
        );
        assert_eq!(evidence.comparison, Comparison::Under);
        assert_eq!(evidence.expected_count, Some(4));
        assert_eq!(evidence.actual_count, 2);
        assert_eq!(evidence.found_on_days, vec![date(2), date(5)]);
        // First two non-matching days, ascending.
        assert_eq!(evidence.missing_on_days, vec![date(1), date(3)]);
    }

    #[test]
    fn above_populates_found_only() {
        let evidence = build_evidence(1, &days(&[(1, true), (2, false), (3, true)]));
        assert_eq!(evidence.comparison, Comparison::Above);
        assert_eq!(evidence.found_on_days, vec![date(1), date(3)]);
        assert!(evidence.missing_on_days.is_empty());
    }

    #[test]
    fn even_keeps_both_sequences_empty() {
        let evidence = build_evidence(2, &days(&[(1, true), (2, false), (3, true)]));
        assert_eq!(evidence.comparison, Comparison::Even);
        assert!(evidence.found_on_days.is_empty());
        assert!(evidence.missing_on_days.is_empty());
    }

    #[test]
    fn deficit_larger_than_window_is_capped() {
        // Expected 10 over a 3-day window with no matches: missing days
        // cannot exceed the window.
        let evidence = build_evidence(10, &days(&[(1, false), (2, false), (3, false)]));
        assert_eq!(evidence.actual_count, 0);
        assert_eq!(evidence.missing_on_days, vec![date(1), date(2), date(3)]);
    }

    #[test]
    fn empty_window_with_expectation_is_under_with_no_days() {
        let evidence = build_evidence(5, &[]);
        assert_eq!(evidence.comparison, Comparison::Under);
        assert!(evidence.found_on_days.is_empty());
        assert!(evidence.missing_on_days.is_empty());
    }

    #[test]
    fn degraded_evidence_shape() {
        let evidence = degraded_evidence("empty match criteria".to_string());
        assert_eq!(evidence.comparison, Comparison::Even);
        assert_eq!(evidence.expected_count, None);
        assert!(evidence.warning);
        assert_eq!(evidence.note.as_deref(), Some("empty match criteria"));
        assert!(evidence.found_on_days.is_empty());
        assert!(evidence.missing_on_days.is_empty());
    }

    proptest! {
        /// Evidence day counts never exceed the window, both sequences
        /// are ascending, and the builder is deterministic.
        #[test]
        fn evidence_invariants(
            expected in 0u32..40,
            pattern in proptest::collection::vec(any::<bool>(), 0..28),
        ) {
            let window: Vec<(NaiveDate, bool)> = pattern
                .iter()
                .enumerate()
                .map(|(i, &m)| (date(i as u32 + 1), m))
                .collect();

            let evidence = build_evidence(expected, &window);
            let again = build_evidence(expected, &window);
            prop_assert_eq!(&evidence, &again);

            prop_assert!(
                evidence.found_on_days.len() + evidence.missing_on_days.len() <= window.len()
            );
            prop_assert!(evidence.found_on_days.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(evidence.missing_on_days.windows(2).all(|w| w[0] < w[1]));

            let matched = pattern.iter().filter(|&&m| m).count() as u32;
            prop_assert_eq!(evidence.actual_count, matched);
            prop_assert_eq!(evidence.comparison, Comparison::classify(expected, matched));
            if evidence.comparison == Comparison::Under {
                let deficit = (expected - matched) as usize;
                prop_assert!(evidence.missing_on_days.len() <= deficit);
            }
        }
    }
}
