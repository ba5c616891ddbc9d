//! Speech synthesizer trait definition.

use async_trait::async_trait;
use vox_core::{AudioBlob, SpeechRequest, SynthesisError};

/// A source of synthesized audio.
///
/// This trait abstracts over different synthesis engines (espeak-ng, a
/// library binding, a remote service) so the cache can produce audio
/// without knowing how it is made.
///
/// Implementations must be deterministic: identical requests must yield
/// byte-identical audio, otherwise two cache tiers could disagree about
/// the content behind one key. Implementations do no caching of their own.
///
/// # Implementors
///
/// - `EspeakSynthesizer` - Runs the espeak-ng command-line engine
///
/// # Example
///
/// ```ignore
/// use vox_engine::SpeechSynthesizer;
///
/// struct Silence;
///
/// #[async_trait]
/// impl SpeechSynthesizer for Silence {
///     async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioBlob, SynthesisError> {
///         Ok(AudioBlob::new(vec![0u8; 44]))
///     }
///
///     fn name(&self) -> &str {
///         "silence"
///     }
/// }
/// ```
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesizes audio for the given request.
    ///
    /// # Errors
    ///
    /// - `SynthesisError::Unavailable` if the engine cannot be started
    /// - `SynthesisError::Failed` if the engine reports failure
    /// - `SynthesisError::EmptyOutput` if the engine produced no audio
    /// - `SynthesisError::Timeout` if the engine did not finish in time
    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioBlob, SynthesisError>;

    /// Performs a health check on the engine.
    ///
    /// The default implementation assumes the engine is always available.
    async fn health_check(&self) -> Result<(), SynthesisError> {
        Ok(())
    }

    /// Returns the name of this engine, used for logging.
    fn name(&self) -> &str;
}
