//! Command-line player implementation.

use async_trait::async_trait;
use tracing::debug;
use vox_core::{AudioBlob, PlaybackError};

use super::AudioPlayer;
use crate::config::PlayerConfig;
use crate::process::{RunError, run_with_stdin};

/// Plays audio by piping it into an external program such as `aplay -q -`.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    config: PlayerConfig,
}

impl CommandPlayer {
    /// Creates a new command player.
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}

impl Default for CommandPlayer {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, audio: &AudioBlob) -> Result<(), PlaybackError> {
        if audio.is_empty() {
            return Err(PlaybackError::Empty);
        }

        debug!("Playing {} bytes with {}", audio.len(), self.name());

        let output = run_with_stdin(
            self.config.program(),
            self.config.args(),
            audio.to_vec(),
            self.config.timeout(),
        )
        .await
        .map_err(|e| match e {
            RunError::Spawn(e) => PlaybackError::Unavailable {
                player: self.name().to_string(),
                reason: e.to_string(),
            },
            RunError::Io(e) => PlaybackError::Io(e),
            RunError::TimedOut => PlaybackError::Timeout {
                timeout: self.config.timeout(),
            },
        })?;

        if !output.status.success() {
            return Err(PlaybackError::Failed {
                player: self.name().to_string(),
                stderr: output.stderr_text(),
            });
        }

        Ok(())
    }

    fn name(&self) -> &str {
        self.config.player_name()
    }
}
