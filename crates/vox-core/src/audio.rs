//! Immutable synthesized audio buffers.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// An immutable, cheaply clonable audio byte buffer.
///
/// Clones share the same allocation; the bytes are never mutated after
/// construction, which lets the same buffer live in both cache tiers and be
/// handed to any number of callers.
///
/// # Example
///
/// ```
/// use vox_core::AudioBlob;
///
/// let blob = AudioBlob::from(b"RIFF....WAVE".to_vec());
/// let copy = blob.clone();
/// assert_eq!(blob, copy);
/// assert!(blob.is_wav());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AudioBlob(Arc<[u8]>);

impl AudioBlob {
    /// Creates a blob from owned bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the buffer starts with a RIFF/WAVE header.
    pub fn is_wav(&self) -> bool {
        self.0.len() >= 12 && &self.0[0..4] == b"RIFF" && &self.0[8..12] == b"WAVE"
    }

    /// Copies the bytes into a new vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl Deref for AudioBlob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for AudioBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for AudioBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }
}

impl From<&[u8]> for AudioBlob {
    fn from(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }
}

// Audio can be megabytes; never dump it into logs.
impl fmt::Debug for AudioBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioBlob")
            .field("len", &self.0.len())
            .field("wav", &self.is_wav())
            .finish()
    }
}
