//! Content Hash Value Object
//!
//! Immutable SHA-256 digest of a deployable unit's canonical encoding.
//! Recorded on the cluster after each run and compared on the next one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content hash value object
///
/// Wraps a SHA-256 hash string with the `sha256:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Prefix for SHA-256 hashes
    pub const PREFIX: &'static str = "sha256:";

    /// Create a ContentHash from a raw hash string (with or without prefix)
    pub fn new(raw_hash: &str) -> Self {
        if raw_hash.starts_with(Self::PREFIX) {
            Self(raw_hash.to_string())
        } else {
            Self(format!("{}{}", Self::PREFIX, raw_hash))
        }
    }

    /// Create a ContentHash by computing SHA-256 of bytes
    pub fn from_bytes(content: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        let hash = Sha256::digest(content);
        Self(format!("{}{:x}", Self::PREFIX, hash))
    }

    /// Get the full hash string with prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get just the hex part without prefix
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_adds_prefix_if_missing() {
        let hash = ContentHash::new("abc123");
        assert_eq!(hash.as_str(), "sha256:abc123");
    }

    #[test]
    fn new_keeps_prefix_if_present() {
        let hash = ContentHash::new("sha256:abc123");
        assert_eq!(hash.as_str(), "sha256:abc123");
    }

    #[test]
    fn from_bytes_is_sha256_hex() {
        let hash = ContentHash::from_bytes(b"hello");
        assert_eq!(
            hash.hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let hash = ContentHash::new("abc");
        assert_eq!(serde_json::to_string(&hash).unwrap(), "\"sha256:abc\"");
        let back: ContentHash = serde_json::from_str("\"sha256:abc\"").unwrap();
        assert_eq!(back, hash);
    }
}
