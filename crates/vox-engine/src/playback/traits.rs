//! Audio player trait definition.

use async_trait::async_trait;
use vox_core::{AudioBlob, PlaybackError};

/// A device or program that turns audio bytes into sound.
///
/// Players are stateless with respect to the cache: they receive a
/// complete buffer and either play it or fail.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Plays the audio to completion.
    ///
    /// # Errors
    ///
    /// - `PlaybackError::Empty` if the buffer holds no bytes
    /// - `PlaybackError::Unavailable` if the player cannot be started
    /// - `PlaybackError::Failed` if the player reports failure
    async fn play(&self, audio: &AudioBlob) -> Result<(), PlaybackError>;

    /// Returns the name of this player, used for logging.
    fn name(&self) -> &str;
}
