//! espeak-ng backend implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use vox_core::{AudioBlob, SpeechRequest, SynthesisError};

use super::SpeechSynthesizer;
use crate::config::EspeakConfig;
use crate::process::{RunError, run_with_stdin};
use crate::state::EngineState;

/// Consecutive failed runs after which `health_check` reports the engine
/// unavailable without running `--version`. A successful synthesis resets it.
const UNHEALTHY_AFTER_FAILURES: u32 = 3;

/// A synthesizer backed by the espeak-ng command-line engine.
///
/// The text is written to the engine's stdin (`--stdin`) rather than passed
/// as an argument, so text starting with `-` is never taken for an option.
/// The WAV stream is read from stdout (`--stdout`); no temporary files are
/// involved.
pub struct EspeakSynthesizer {
    /// The engine configuration.
    config: EspeakConfig,
    /// Run outcomes, for health reporting.
    state: Arc<EngineState>,
}

impl EspeakSynthesizer {
    /// Creates a new espeak-ng synthesizer.
    pub fn new(config: EspeakConfig) -> Self {
        Self {
            config,
            state: Arc::new(EngineState::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EspeakConfig {
        &self.config
    }

    /// Returns the engine state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Builds the argument list for a request.
    pub fn args_for(&self, request: &SpeechRequest) -> Vec<String> {
        let mut args = self.config.args_prefix().to_vec();
        args.extend([
            "-s".to_string(),
            request.rate().to_string(),
            "-v".to_string(),
            request.voice().to_string(),
            "--stdout".to_string(),
            "--stdin".to_string(),
        ]);
        args.extend(self.config.extra_args().iter().cloned());
        args
    }

    fn map_run_error(&self, error: RunError) -> SynthesisError {
        match error {
            RunError::Spawn(e) => SynthesisError::unavailable(self.name(), e.to_string()),
            RunError::Io(e) => SynthesisError::Io(e),
            RunError::TimedOut => SynthesisError::Timeout {
                timeout: self.config.timeout(),
            },
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for EspeakSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioBlob, SynthesisError> {
        debug!("Synthesizing {} with {}", request, self.name());

        let result = run_with_stdin(
            self.config.program(),
            self.args_for(request),
            request.text().as_bytes().to_vec(),
            self.config.timeout(),
        )
        .await;

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                let err = self.map_run_error(e);
                self.state.record_failure(err.to_string());
                return Err(err);
            },
        };

        if !output.status.success() {
            let err = SynthesisError::failed(self.name(), output.status.code(), output.stderr_text());
            warn!("Synthesis failed: {}", err);
            self.state.record_failure(err.to_string());
            return Err(err);
        }

        if output.stdout.is_empty() {
            let err = SynthesisError::empty_output(self.name());
            self.state.record_failure(err.to_string());
            return Err(err);
        }

        self.state.record_success();
        debug!("Synthesized {} bytes for {}", output.stdout.len(), request);

        Ok(AudioBlob::from(output.stdout))
    }

    async fn health_check(&self) -> Result<(), SynthesisError> {
        let failures = self.state.failure_count();
        if failures >= UNHEALTHY_AFTER_FAILURES {
            let since = match self.state.time_since_success() {
                Some(elapsed) => format!("last success {}s ago", elapsed.as_secs()),
                None => "never succeeded".to_string(),
            };
            return Err(SynthesisError::unavailable(
                self.name(),
                format!(
                    "{} consecutive failures, {}, last error: {}",
                    failures,
                    since,
                    self.state.last_error().unwrap_or_default()
                ),
            ));
        }

        let mut args = self.config.args_prefix().to_vec();
        args.push("--version".to_string());

        let output = run_with_stdin(self.config.program(), args, Vec::new(), self.config.timeout())
            .await
            .map_err(|e| self.map_run_error(e))?;

        if !output.status.success() {
            return Err(SynthesisError::failed(
                self.name(),
                output.status.code(),
                output.stderr_text(),
            ));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        self.config.engine_name()
    }
}

impl std::fmt::Debug for EspeakSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EspeakSynthesizer")
            .field("program", &self.config.program())
            .field("timeout", &self.config.timeout())
            .field("runs", &self.state.runs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// An engine that runs `script` through `sh`; the synthesis options
    /// arrive as positional parameters.
    fn scripted(script: &str) -> EspeakSynthesizer {
        let config = EspeakConfig::builder()
            .program("sh")
            .args_prefix(vec!["-c", script, "espeak-ng"])
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        EspeakSynthesizer::new(config)
    }

    fn hello() -> SpeechRequest {
        SpeechRequest::new("hello", "en-us", "150")
    }

    #[test]
    fn test_args_for_request() {
        let engine = EspeakSynthesizer::new(
            EspeakConfig::builder().extra_arg("-a").extra_arg("100").build().unwrap(),
        );

        let args = engine.args_for(&SpeechRequest::new("-not-an-option", "EN-GB", "175"));
        assert_eq!(
            args,
            vec!["-s", "175", "-v", "en-gb", "--stdout", "--stdin", "-a", "100"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_reads_audio_from_stdout() {
        let engine = scripted("printf RIFF; cat");

        let audio = engine.synthesize(&hello()).await.unwrap();

        assert_eq!(audio.as_bytes(), b"RIFFhello");
        assert_eq!(engine.state().runs(), 1);
        assert!(engine.state().is_healthy());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_passes_voice_and_rate() {
        let engine = scripted("printf '%s ' \"$@\"");

        let audio = engine.synthesize(&hello()).await.unwrap();

        assert_eq!(
            String::from_utf8_lossy(audio.as_bytes()),
            "-s 150 -v en-us --stdout --stdin "
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let engine = scripted("echo 'unknown voice' >&2; exit 1");

        let err = engine.synthesize(&hello()).await.unwrap_err();

        match err {
            SynthesisError::Failed { status, stderr, .. } => {
                assert_eq!(status, Some(1));
                assert_eq!(stderr, "unknown voice");
            },
            other => panic!("Expected Failed, got {:?}", other),
        }
        assert_eq!(engine.state().failure_count(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_is_failure() {
        let engine = scripted("cat > /dev/null");

        let err = engine.synthesize(&hello()).await.unwrap_err();

        assert!(matches!(err, SynthesisError::EmptyOutput { .. }));
        assert!(!engine.state().is_healthy());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let config = EspeakConfig::builder()
            .program("sh")
            .args_prefix(vec!["-c", "sleep 5", "espeak-ng"])
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let engine = EspeakSynthesizer::new(config);

        let err = engine.synthesize(&hello()).await.unwrap_err();

        match &err {
            SynthesisError::Timeout { timeout } => assert_eq!(*timeout, Duration::from_millis(100)),
            other => panic!("Expected Timeout, got {:?}", other),
        }
        assert_eq!(err.to_string(), "synthesis timed out after 100ms");
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_missing_engine_is_unavailable() {
        let config = EspeakConfig::builder()
            .program("/nonexistent/espeak-ng")
            .build()
            .unwrap();
        let engine = EspeakSynthesizer::new(config);

        let err = engine.synthesize(&hello()).await.unwrap_err();
        assert!(matches!(err, SynthesisError::Unavailable { .. }));

        let err = engine.health_check().await.unwrap_err();
        assert!(matches!(err, SynthesisError::Unavailable { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_health_check_runs_version() {
        let engine = scripted("test \"$1\" = --version");
        assert!(engine.health_check().await.is_ok());

        let engine = scripted("exit 2");
        assert!(engine.health_check().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_health_check_reports_repeated_failures() {
        // Responde a --version pero falla toda sintesis
        let engine = scripted("test \"$1\" = --version || { echo 'voice not found' >&2; exit 1; }");

        for _ in 0..UNHEALTHY_AFTER_FAILURES - 1 {
            assert!(engine.synthesize(&hello()).await.is_err());
        }
        assert!(engine.health_check().await.is_ok());

        assert!(engine.synthesize(&hello()).await.is_err());
        let err = engine.health_check().await.unwrap_err();

        match err {
            SynthesisError::Unavailable { reason, .. } => {
                assert!(reason.contains("3 consecutive failures"));
                assert!(reason.contains("never succeeded"));
                assert!(reason.contains("voice not found"));
            }
            other => panic!("Expected Unavailable, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_restores_health() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("ready");
        let script = format!(
            "test \"$1\" = --version && exit 0; test -f '{}' || exit 1; printf RIFF; cat",
            marker.display()
        );
        let engine = scripted(&script);

        for _ in 0..UNHEALTHY_AFTER_FAILURES {
            assert!(engine.synthesize(&hello()).await.is_err());
        }
        assert!(engine.health_check().await.is_err());

        std::fs::write(&marker, b"").unwrap();
        engine.synthesize(&hello()).await.unwrap();

        assert_eq!(engine.state().failure_count(), 0);
        assert!(engine.health_check().await.is_ok());
    }
}
