//! # Canonical Serialization
//!
//! Defines [`CanonicalBytes`], the sole construction path for bytes used
//! in digest computation. Re-running a check must reproduce the previous
//! digest byte for byte, so every value that feeds a digest goes through
//! one canonicalization pipeline:
//!
//! 1. Reject floats — evidence carries integer counts and date strings only.
//! 2. Normalize RFC 3339 strings to UTC with `Z` suffix, truncated to seconds.
//! 3. Sort object keys lexicographically (serde_json's default map order).
//! 4. Compact separators, no whitespace.
//!
//! The inner `Vec<u8>` is private: the only way to obtain canonical bytes
//! is [`CanonicalBytes::new`], which makes "digest of the wrong
//! serialization" unrepresentable.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce(value)?;
        Ok(Self(serde_json::to_vec(&coerced)?))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively apply the canonicalization coercion rules.
fn coerce(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                // as_f64 is always Some for an f64-classified number.
                return Err(CanonicalizationError::FloatRejected(
                    n.as_f64().unwrap_or_default(),
                ));
            }
            Ok(Value::Number(n))
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce).collect();
            Ok(Value::Array(coerced?))
        }
        Value::String(s) => {
            // Timestamp normalization: RFC 3339 strings become UTC with
            // second precision so subsecond noise never reaches a digest.
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                let utc = dt.with_timezone(&chrono::Utc);
                Ok(Value::String(utc.format("%Y-%m-%dT%H:%M:%SZ").to_string()))
            } else {
                Ok(Value::String(s))
            }
        }
        other => Ok(other),
    }
}
