// ── Node address legalization ──
//
// ISY node addresses are limited to 14 characters of lowercase letters and
// digits. Tag manager MACs (12 hex digits) fit as-is once separators are
// dropped; longer identifiers such as tag UUIDs get a short prefix plus a
// hash of the raw input.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of an ISY node address.
pub const MAX_ADDRESS_LEN: usize = 14;

const PREFIX_LEN: usize = MAX_ADDRESS_LEN - 8;

/// A legal node address for the home-automation hub.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeAddress(String);

impl NodeAddress {
    /// Legalize an arbitrary identifier. See [`legalize`].
    pub fn legalize(raw: &str) -> Self {
        legalize(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turn `raw` into a legal node address.
///
/// Lowercases and keeps only `[a-z0-9]`. Results of 1..=14 characters are
/// used directly; anything else becomes the first six sanitized characters
/// followed by the FNV-1a hash of `raw` in hex.
pub fn legalize(raw: &str) -> NodeAddress {
    let sanitized: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if !sanitized.is_empty() && sanitized.len() <= MAX_ADDRESS_LEN {
        return NodeAddress(sanitized);
    }

    let prefix: String = sanitized.chars().take(PREFIX_LEN).collect();
    NodeAddress(format!("{prefix}{:08x}", fnv1a(raw.as_bytes())))
}

fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    bytes.iter().fold(OFFSET_BASIS, |hash, &b| {
        (hash ^ u32::from(b)).wrapping_mul(PRIME)
    })
}
