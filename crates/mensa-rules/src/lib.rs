//! # mensa-rules — Compliance Rule Definitions
//!
//! The rule vocabulary the evaluator runs against: [`ComplianceRule`]
//! with its closed [`RuleType`] and [`MatchCriteria`] variants,
//! validation, severity derivation, and expected-count math.
//!
//! The evaluator treats rules as immutable snapshots: a re-run re-reads
//! current definitions, never mutates them.

pub mod criteria;
pub mod rule;

pub use criteria::MatchCriteria;
pub use rule::{ComplianceRule, RulePeriod, RuleType};
