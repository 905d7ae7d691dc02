//! # Content Digests
//!
//! SHA-256 digests over [`CanonicalBytes`]. A check's result set is
//! digested at persist time; re-running the check over unchanged inputs
//! must reproduce the same digest, which is how idempotence is verified
//! end to end instead of by field-by-field comparison.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CanonicalizationError;

/// A SHA-256 content digest, rendered as lowercase hex on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Digest canonical bytes.
    pub fn from_canonical(bytes: &CanonicalBytes) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Canonicalize and digest any serializable value.
    pub fn of(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        Ok(Self::from_canonical(&CanonicalBytes::new(obj)?))
    }

    /// Return the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character lowercase hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hi = (chunk[0] as char).to_digit(16)?;
            let lo = (chunk[1] as char).to_digit(16)?;
            bytes[i] = ((hi << 4) | lo) as u8;
        }
        Some(Self(bytes))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid digest hex: {raw}")))
    }
}
