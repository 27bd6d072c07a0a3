//! Pair-key canonicalization and the tagged n-gram/position keyspace.
//!
//! The reference implementation dispatches dynamically over a string key
//! `"g"` and integer position keys `0, 1, 2, ...`. We model that as an
//! explicit tagged enum instead, with parallel storage per keyspace,
//! unifying the two only where the training loop actually needs to (see
//! `training::train`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which family a pair of components/ngrams belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyspace {
    /// The final-ngram keyspace (the source's `"g"`).
    Ngram,
    /// A per-position component keyspace (the source's integer keys).
    Position(u16),
}

impl fmt::Display for Keyspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keyspace::Ngram => write!(f, "g"),
            Keyspace::Position(i) => write!(f, "{i}"),
        }
    }
}

/// A sorted-unordered pair of strings, canonicalized once at construction.
///
/// Every table keyed by a pair of components/ngrams/words uses this type so
/// that `(a,b)` and `(b,a)` always collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let a = a.into();
        let b = b.into();
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn first(&self) -> &str {
        &self.0
    }

    pub fn second(&self) -> &str {
        &self.1
    }

    /// Stringify as the spec's `"[a,b]"` sorted 2-tuple for JSON map keys.
    pub fn to_json_key(&self) -> String {
        serde_json::to_string(&[&self.0, &self.1]).expect("string pair always serializes")
    }

    /// Parse a `"[a,b]"` JSON-array key back into a `PairKey`.
    ///
    /// Accepts the pair in either order and re-canonicalizes; callers that
    /// need to reject non-canonical input should compare against
    /// `to_json_key` themselves.
    pub fn from_json_key(key: &str) -> Result<Self, String> {
        let parts: Vec<String> = serde_json::from_str(key)
            .map_err(|e| format!("expected a 2-element JSON array: {e}"))?;
        match <[String; 2]>::try_from(parts) {
            Ok([a, b]) => Ok(PairKey::new(a, b)),
            Err(parts) => Err(format!(
                "expected exactly 2 elements, found {}",
                parts.len()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(PairKey::new("b", "a"), PairKey::new("a", "b"));
    }

    #[test]
    fn json_key_round_trips() {
        let k = PairKey::new("zzz", "aaa");
        let s = k.to_json_key();
        assert_eq!(s, "[\"aaa\",\"zzz\"]");
        assert_eq!(PairKey::from_json_key(&s).unwrap(), k);
    }

    #[test]
    fn keyspace_display() {
        assert_eq!(Keyspace::Ngram.to_string(), "g");
        assert_eq!(Keyspace::Position(3).to_string(), "3");
    }
}
