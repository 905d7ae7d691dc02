//! # Comparison Classification
//!
//! Defines [`Comparison`], the three-valued outcome of one rule's
//! expected-vs-actual serving counts, and the pure classification
//! function that produces it. No other component computes comparisons:
//! the evaluator, the stored counters, and the dashboard all derive
//! from [`Comparison::classify`], so the classification can never
//! diverge between layers.

use serde::{Deserialize, Serialize};

/// Outcome of comparing actual serving days against a rule's expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Served more often than the rule expects.
    Above,
    /// Served less often than the rule expects.
    Under,
    /// Served exactly as often as the rule expects.
    Even,
}

impl Comparison {
    /// Classify an `(expected, actual)` pair.
    ///
    /// Total over all inputs: `actual > expected` is [`Above`],
    /// `actual < expected` is [`Under`], equality is [`Even`].
    /// There is no fourth outcome.
    ///
    /// [`Above`]: Comparison::Above
    /// [`Under`]: Comparison::Under
    /// [`Even`]: Comparison::Even
    pub fn classify(expected: u32, actual: u32) -> Self {
        match actual.cmp(&expected) {
            std::cmp::Ordering::Greater => Self::Above,
            std::cmp::Ordering::Less => Self::Under,
            std::cmp::Ordering::Equal => Self::Even,
        }
    }

    /// Wire identifier (snake_case, matches the serde form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Under => "under",
            Self::Even => "even",
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
