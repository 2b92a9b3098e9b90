//! Statement fingerprinting.
//!
//! A [`Fingerprint`] is the cache key for one query: a SHA-256 digest over
//! the statement's SQL text and every bound parameter value, in bind order.
//! Two statements that differ in text or in any parameter value produce
//! different fingerprints; identical statements always produce the same one.
//!
//! ```rust
//! use strata_cache::Fingerprint;
//! use strata_query::Statement;
//!
//! let a = Fingerprint::of(&Statement::new("SELECT * FROM users WHERE id = $1").bind(1));
//! let b = Fingerprint::of(&Statement::new("SELECT * FROM users WHERE id = $1").bind(2));
//! assert_ne!(a, b);
//! ```

use std::fmt;

use sha2::{Digest, Sha256};
use strata_query::{ParamValue, Statement};

/// A deterministic digest of a statement's text and bound parameters,
/// rendered as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Length of the hex rendering (SHA-256).
    pub const LEN: usize = 64;

    /// Compute the fingerprint of a statement.
    ///
    /// Pure: no I/O, no side effects. The text and each parameter are fed to
    /// the hasher with type and length framing, so adjacent values cannot be
    /// re-split into a colliding encoding.
    pub fn of(statement: &Statement) -> Self {
        let mut hasher = Sha256::new();
        hash_bytes(&mut hasher, statement.sql().as_bytes());
        for param in statement.params() {
            hash_param(&mut hasher, param);
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// The hex digest.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Feed a length-prefixed byte run to the hasher.
fn hash_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Feed one parameter value to the hasher, tagged by type.
fn hash_param(hasher: &mut Sha256, value: &ParamValue) {
    match value {
        ParamValue::Null => hasher.update([0u8]),
        ParamValue::Bool(b) => hasher.update([1u8, *b as u8]),
        ParamValue::Int(i) => {
            hasher.update([2u8]);
            hasher.update(i.to_le_bytes());
        }
        ParamValue::Float(f) => {
            // Bit pattern, not numeric value: covers NaN and signed zero
            // deterministically.
            hasher.update([3u8]);
            hasher.update(f.to_bits().to_le_bytes());
        }
        ParamValue::String(s) => {
            hasher.update([4u8]);
            hash_bytes(hasher, s.as_bytes());
        }
        ParamValue::Json(v) => {
            hasher.update([5u8]);
            hash_bytes(hasher, v.to_string().as_bytes());
        }
        ParamValue::List(items) => {
            hasher.update([6u8]);
            hasher.update((items.len() as u64).to_le_bytes());
            for item in items {
                hash_param(hasher, item);
            }
        }
    }
}
