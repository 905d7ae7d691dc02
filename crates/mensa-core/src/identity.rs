//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the engine.
//! Each identifier is a distinct type — you cannot pass a [`RuleId`]
//! where a [`DishId`] is expected, and a mixed-up join between the
//! catalog and the rule store is a compile error rather than a data bug.
//!
//! All identifiers are UUID-backed and always valid by construction.
//! [`CheckId`] doubles as a UUIDv5 namespace for deterministic
//! per-result identifiers (see `CheckResult::id_for` in [`crate::check`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

uuid_newtype! {
    /// A unique identifier for a catering site whose menus are checked.
    SiteId
}

uuid_newtype! {
    /// A unique identifier for one compliance check run (one site, one month).
    CheckId
}

uuid_newtype! {
    /// A unique identifier for a compliance rule definition.
    RuleId
}

uuid_newtype! {
    /// A unique identifier for a dish catalog entry.
    DishId
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ids_are_distinct_types() {
        // This is a compile-time property; here we only confirm the
        // runtime surface behaves like a UUID.
        let id = RuleId::new();
        let round = RuleId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, round);
    }

    #[test]
    fn from_uuid_preserves_value() {
        let raw = Uuid::new_v4();
        let id = DishId::from_uuid(raw);
        assert_eq!(id.as_uuid(), &raw);
    }

    #[test]
    fn serde_is_transparent() {
        let id = CheckId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: CheckId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!(SiteId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn default_generates_fresh_ids() {
        assert_ne!(SiteId::default(), SiteId::default());
    }
}
