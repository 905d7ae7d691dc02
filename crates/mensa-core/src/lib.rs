//! # mensa-core — Foundational Types for the Menu Compliance Engine
//!
//! Shared vocabulary for every crate in the workspace:
//!
//! - [`identity`]: UUID-backed identifier newtypes ([`SiteId`], [`CheckId`],
//!   [`RuleId`], [`DishId`]).
//! - [`temporal`]: the [`MenuPeriod`] calendar-month type all date
//!   arithmetic flows through.
//! - [`category`]: the closed [`DishCategory`] enum with bilingual labels.
//! - [`comparison`]: the [`Comparison`] outcome and its pure
//!   classification function.
//! - [`check`]: data contracts for deposited menus, check runs, and
//!   per-rule results with day-level evidence.
//! - [`canonical`] / [`digest`]: canonical JSON bytes and SHA-256 content
//!   digests used to witness byte-identical re-runs.
//! - [`error`]: the structured error hierarchy.
//!
//! This crate depends on no other workspace member.

pub mod canonical;
pub mod category;
pub mod check;
pub mod comparison;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use category::DishCategory;
pub use check::{
    CheckResult, CheckStatus, CheckTally, MenuCheck, MenuDay, ParsedMenu, RuleEvidence, Severity,
};
pub use comparison::Comparison;
pub use digest::ContentDigest;
pub use error::{CanonicalizationError, MensaError, ValidationError};
pub use identity::{CheckId, DishId, RuleId, SiteId};
pub use temporal::MenuPeriod;
