//! Content-addressed cache key derivation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::types::{Rate, SpeechRequest, Voice};

/// Version tag mixed into every key. Changing the canonical encoding
/// requires bumping it so old rows are never read under new semantics.
const KEY_DOMAIN: &[u8] = b"vox-key-v1";

/// Key unica para el cache de audio.
///
/// A 256-bit SHA-256 digest over the canonical encoding of everything that
/// affects the synthesized output: text, voice and rate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Length of a key in bytes.
    pub const LEN: usize = 32;

    /// Wraps raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Builds a key from a slice, returning `None` unless it is exactly
    /// [`CacheKey::LEN`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(bytes).ok().map(Self)
    }

    /// Parses a 64 character lowercase or uppercase hex string.
    pub fn from_hex(encoded: &str) -> Option<Self> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(encoded, &mut out).ok()?;
        Some(Self(out))
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the first 12 hex characters, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.short())
    }
}

impl Serialize for CacheKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CacheKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_hex(&encoded)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid cache key: {}", encoded)))
    }
}

/// Derives cache keys from speech requests.
///
/// Pure and infallible. Each component is length-prefixed before hashing,
/// so no choice of text can make two different triples encode to the same
/// byte stream.
///
/// # Example
///
/// ```
/// use vox_core::{KeyDeriver, SpeechRequest};
///
/// let a = KeyDeriver::derive(&SpeechRequest::new("hello", "en-us", "150"));
/// let b = KeyDeriver::derive(&SpeechRequest::new("hello", "en-gb", "150"));
/// assert_ne!(a, b);
/// ```
pub struct KeyDeriver;

impl KeyDeriver {
    /// Derives the key for a request.
    pub fn derive(request: &SpeechRequest) -> CacheKey {
        Self::derive_parts(request.text(), request.voice(), request.rate())
    }

    /// Derives the key for already-separated components.
    pub fn derive_parts(text: &str, voice: &Voice, rate: &Rate) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(KEY_DOMAIN);
        for part in [text, voice.as_str(), rate.as_str()] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        CacheKey(hasher.finalize().into())
    }
}
