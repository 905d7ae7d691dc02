//! # mensa-engine — Menu Compliance Evaluation Engine
//!
//! The hidden core behind the compliance dashboard: given a deposited
//! month of daily menus and the current rule set, produce a
//! [`MenuCheck`](mensa_core::MenuCheck) with per-rule
//! [`CheckResult`](mensa_core::CheckResult)s and day-level evidence.
//!
//! ## Pipeline
//!
//! ```text
//! ParsedMenu → DishMatcher → DishCatalog (read/insert)
//!            → evaluate_rules (per rule) → build_evidence
//!            → CheckOrchestrator → CheckStore (snapshot-and-swap)
//! ```
//!
//! Determinism is load-bearing throughout: rule ordering, day ordering,
//! evidence construction, and result identifiers are all reproducible,
//! and the check store digests each persisted result set so a re-run
//! over unchanged inputs can be proven byte-identical.

pub mod evaluator;
pub mod evidence;
pub mod matcher;
pub mod orchestrator;
pub mod stores;

pub use evaluator::{evaluate_rules, verify_rule_links};
pub use evidence::{build_evidence, degraded_evidence};
pub use matcher::{day_matches_rule, CompiledCriteria, DishMatcher, ResolvedDay, ResolvedDish};
pub use orchestrator::CheckOrchestrator;
pub use stores::{CheckFilter, CheckStore, ComplianceStats, MenuStore, RuleStore};
