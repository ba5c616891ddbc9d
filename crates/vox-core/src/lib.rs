//! Vox Core - Domain types and traits
//!
//! This crate provides the foundational types shared by the Vox synthesis
//! cache: speech requests, audio buffers, content-addressed cache keys and
//! the error taxonomy used across the workspace.

pub mod audio;
pub mod error;
pub mod key;
pub mod types;

pub use audio::AudioBlob;
pub use error::{PlaybackError, SpeakError, StorageError, SynthesisError};
pub use key::{CacheKey, KeyDeriver};
pub use types::{Rate, SpeechRequest, Voice};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
