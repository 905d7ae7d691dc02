//! # Error Hierarchy
//!
//! Structured error types for the whole engine, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! The taxonomy follows the evaluation pipeline's failure policy:
//! missing inputs surface as [`MensaError::NotFound`], concurrent runs on
//! one check key as [`MensaError::Conflict`], malformed rule definitions
//! as [`ValidationError`] (isolated per rule, never fatal to a run), and
//! write failures during an atomic replace as [`MensaError::Persistence`]
//! (the prior result set stays untouched).

use thiserror::Error;

/// Top-level error type for the engine.
#[derive(Error, Debug)]
pub enum MensaError {
    /// A referenced resource does not exist for the given key.
    /// Surfaced to the caller; not retryable.
    #[error("{resource} not found: {key}")]
    NotFound {
        /// The resource kind ("menu", "check", "rule", "dish").
        resource: &'static str,
        /// The lookup key, rendered for diagnostics.
        key: String,
    },

    /// A check run is already in flight for the same (site, period) key.
    /// The caller may retry after backoff.
    #[error("check already running for {0}")]
    Conflict(String),

    /// Input validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A stored reference points at a record that no longer exists.
    /// This is a data-integrity defect, never silently nulled.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// The atomic write-back of a check run failed; the run is rolled
    /// back and prior results remain visible.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Canonicalization failure during digest computation.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Validation errors for domain inputs.
///
/// Each variant carries the offending input so operators can diagnose
/// bad deposits or rule definitions without guesswork.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Month outside 1..=12.
    #[error("invalid month: {0} (expected 1..=12)")]
    InvalidMonth(u32),

    /// Period string not in `YYYY-MM` form.
    #[error("invalid period: \"{0}\" (expected YYYY-MM)")]
    InvalidPeriod(String),

    /// A deposited menu day falls outside the deposit's period.
    #[error("menu day {date} is outside period {period}")]
    DayOutsidePeriod {
        /// The offending date.
        date: chrono::NaiveDate,
        /// The period the deposit was made for.
        period: String,
    },

    /// The same date appears twice in one menu deposit.
    #[error("duplicate menu day: {0}")]
    DuplicateDay(chrono::NaiveDate),

    /// A rule's match criteria contain no usable matcher.
    #[error("empty match criteria for rule \"{0}\"")]
    EmptyCriteria(String),

    /// A criteria entry normalized to the empty string.
    #[error("blank term in match criteria for rule \"{0}\"")]
    BlankCriteriaTerm(String),

    /// A rule's frequency must be at least 1.
    #[error("zero frequency for rule \"{0}\"")]
    ZeroFrequency(String),

    /// Unknown dish category name.
    #[error("unknown dish category: \"{0}\"")]
    UnknownCategory(String),

    /// A dish name normalized to the empty string.
    #[error("dish name is empty after normalization: \"{0}\"")]
    EmptyDishName(String),

    /// A rule name must be non-empty.
    #[error("rule name must not be empty")]
    EmptyRuleName,
}

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations:
    /// counts are integers and dates are strings, so a float indicates
    /// a non-deterministic field leaking into digest input.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_carries_resource_and_key() {
        let err = MensaError::NotFound {
            resource: "menu",
            key: "site-1/2026-01".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("menu"));
        assert!(msg.contains("2026-01"));
    }

    #[test]
    fn conflict_display() {
        let err = MensaError::Conflict("site-1/2026-01".to_string());
        assert!(format!("{err}").contains("already running"));
    }

    #[test]
    fn validation_error_wraps_into_mensa_error() {
        let err: MensaError = ValidationError::InvalidMonth(13).into();
        assert!(format!("{err}").contains("13"));
    }

    #[test]
    fn day_outside_period_display() {
        let err = ValidationError::DayOutsidePeriod {
            date: chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            period: "2026-01".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("2026-02-01"));
        assert!(msg.contains("2026-01"));
    }

    #[test]
    fn canonicalization_float_rejected_display() {
        let err = CanonicalizationError::FloatRejected(2.5);
        assert!(format!("{err}").contains("2.5"));
    }

    #[test]
    fn all_error_types_are_debug() {
        let e1 = MensaError::Integrity("dangling rule".to_string());
        let e2 = ValidationError::EmptyRuleName;
        let e3 = CanonicalizationError::FloatRejected(0.0);
        assert!(!format!("{e1:?}").is_empty());
        assert!(!format!("{e2:?}").is_empty());
        assert!(!format!("{e3:?}").is_empty());
    }
}
