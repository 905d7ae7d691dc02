//! # Compliance Rules
//!
//! A [`ComplianceRule`] is a configured expectation about how often a
//! dish or dish category must appear in a site's monthly menu. Rules are
//! immutable during a check run and edited out-of-band via the rules
//! CRUD; the evaluator re-reads current definitions on every run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mensa_core::{MenuPeriod, RuleId, Severity, ValidationError};

use crate::criteria::MatchCriteria;

/// How the expected count constrains the actual count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Must appear at least `frequency` times per period.
    MinFrequency,
    /// Must appear at most `frequency` times per period.
    MaxFrequency,
    /// Must appear exactly `frequency` times per period.
    ExactFrequency,
}

impl RuleType {
    /// Wire identifier (snake_case, matches the serde form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinFrequency => "min_frequency",
            Self::MaxFrequency => "max_frequency",
            Self::ExactFrequency => "exact_frequency",
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The period a rule's frequency is stated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePeriod {
    /// Frequency per calendar month.
    Month,
    /// Frequency per week; scaled by the ISO weeks the site served in.
    Week,
}

/// A configured compliance expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub id: RuleId,
    /// Unique display name, e.g. "Fresh Fruit".
    pub name: String,
    /// Display grouping, e.g. "Menu Variety" or "Daily Requirements".
    pub category: Option<String>,
    pub rule_type: RuleType,
    pub match_criteria: MatchCriteria,
    /// Expected servings per `period`.
    pub frequency: u32,
    pub period: RulePeriod,
    /// 0–1 is the critical tier; higher values report as warnings.
    pub priority: u8,
    /// Inactive rules are skipped by evaluation but kept for history.
    pub is_active: bool,
}

impl ComplianceRule {
    /// Validate the rule definition as a whole.
    ///
    /// Evaluation calls this per rule and degrades (never aborts) on
    /// failure; the CRUD surface calls it up front and rejects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyRuleName);
        }
        if self.frequency == 0 {
            return Err(ValidationError::ZeroFrequency(self.name.clone()));
        }
        self.match_criteria.validate(&self.name)
    }

    /// Expected serving days for a window of served dates.
    ///
    /// Monthly frequencies apply directly. Weekly frequencies scale by
    /// the distinct ISO weeks the site actually served in, so a short
    /// month or a holiday-trimmed window lowers the expectation rather
    /// than assuming four fixed weeks.
    pub fn expected_count(&self, served_dates: &[NaiveDate]) -> u32 {
        match self.period {
            RulePeriod::Month => self.frequency,
            RulePeriod::Week => self.frequency * MenuPeriod::iso_week_count(served_dates),
        }
    }

    /// Severity tier derived from the rule's priority.
    pub fn severity(&self) -> Severity {
        if self.priority <= 1 {
            Severity::Critical
        } else {
            Severity::Warning
        }
    }
}
