//! Error types for Vox.
//!
//! Every failure a caller of the synthesis cache can observe is a distinct
//! variant: a failed engine run, an unreadable or unwritable durable tier,
//! or a withdrawn request. "Absent" is never encoded as an error and an
//! error is never encoded as "absent".
//!
//! # Example
//!
//! ```
//! use vox_core::{SpeakError, SynthesisError};
//!
//! fn render(text: &str) -> Result<Vec<u8>, SpeakError> {
//!     if text.is_empty() {
//!         return Err(SynthesisError::unavailable("espeak-ng", "not installed").into());
//!     }
//!     Ok(text.as_bytes().to_vec())
//! }
//!
//! assert!(render("").unwrap_err().is_synthesis());
//! ```

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The synthesis engine failed to produce audio.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The engine could not be started or is not installed.
    #[error("synthesis engine '{engine}' unavailable: {reason}")]
    Unavailable {
        /// Engine name
        engine: String,
        /// Why it could not run
        reason: String,
    },

    /// The engine ran and reported failure.
    #[error("synthesis engine '{engine}' failed (exit status {}): {stderr}", status.map_or_else(|| "unknown".to_string(), |s| s.to_string()))]
    Failed {
        /// Engine name
        engine: String,
        /// Process exit code, if the engine reported one
        status: Option<i32>,
        /// Diagnostic output from the engine
        stderr: String,
    },

    /// The engine reported success but produced no audio.
    #[error("synthesis engine '{engine}' produced no audio")]
    EmptyOutput {
        /// Engine name
        engine: String,
    },

    /// The engine did not finish in time.
    #[error("synthesis timed out after {timeout:?}")]
    Timeout {
        /// Configured limit
        timeout: Duration,
    },

    /// I/O error talking to the engine.
    #[error("synthesis I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SynthesisError {
    /// Creates an Unavailable error.
    pub fn unavailable(engine: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            engine: engine.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Failed error.
    pub fn failed(engine: impl Into<String>, status: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::Failed {
            engine: engine.into(),
            status,
            stderr: stderr.into(),
        }
    }

    /// Creates an EmptyOutput error.
    pub fn empty_output(engine: impl Into<String>) -> Self {
        Self::EmptyOutput {
            engine: engine.into(),
        }
    }

    /// Returns true if a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Io(_))
    }
}

/// The durable tier failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be opened or its schema created.
    #[error("failed to open audio store at {}: {message}", path.display())]
    Open {
        /// Location of the store
        path: PathBuf,
        /// Description of the failure
        message: String,
        /// Underlying error
        #[source]
        cause: Option<BoxError>,
    },

    /// A read or write against the store failed.
    #[error("audio store {operation} failed: {message}")]
    Backend {
        /// Operation that failed ("get", "put", ...)
        operation: String,
        /// Description of the failure
        message: String,
        /// Underlying error
        #[source]
        cause: Option<BoxError>,
    },

    /// The blocking task running the operation panicked or was aborted.
    #[error("audio store task failed: {0}")]
    Task(String),
}

impl StorageError {
    /// Creates an Open error with a cause.
    pub fn open<E>(path: impl Into<PathBuf>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Open {
            path: path.into(),
            message: cause.to_string(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Backend error with a cause.
    pub fn backend<E>(operation: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            operation: operation.into(),
            message: cause.to_string(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Backend error without a cause.
    pub fn backend_message(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Task error.
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task(message.into())
    }
}

/// The playback device failed.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The player could not be started.
    #[error("audio player '{player}' unavailable: {reason}")]
    Unavailable {
        /// Player program
        player: String,
        /// Why it could not run
        reason: String,
    },

    /// The player exited with an error.
    #[error("audio player '{player}' failed: {stderr}")]
    Failed {
        /// Player program
        player: String,
        /// Diagnostic output
        stderr: String,
    },

    /// The player did not finish in time.
    #[error("playback timed out after {timeout:?}")]
    Timeout {
        /// Configured limit
        timeout: Duration,
    },

    /// There was nothing to play.
    #[error("no audio to play")]
    Empty,

    /// I/O error talking to the player.
    #[error("playback I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Error returned by the synthesis cache to callers of `speak`.
#[derive(Debug, Error)]
pub enum SpeakError {
    /// Synthesis failed; nothing was cached.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The durable tier could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The caller withdrew the request before it completed.
    #[error("speech request cancelled")]
    Cancelled,
}

impl SpeakError {
    /// Returns true if this is a synthesis failure.
    pub fn is_synthesis(&self) -> bool {
        matches!(self, Self::Synthesis(_))
    }

    /// Returns true if this is a storage failure.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_failed_display() {
        let err = SynthesisError::failed("espeak-ng", Some(1), "unknown voice 'xx'");
        let msg = err.to_string();
        assert!(msg.contains("espeak-ng"));
        assert!(msg.contains("exit status 1"));
        assert!(msg.contains("unknown voice"));

        let err = SynthesisError::failed("espeak-ng", None, "killed");
        assert!(err.to_string().contains("exit status unknown"));
    }

    #[test]
    fn test_is_transient() {
        assert!(SynthesisError::Timeout { timeout: Duration::from_secs(30) }.is_transient());
        assert!(!SynthesisError::empty_output("espeak-ng").is_transient());
        assert!(!SynthesisError::unavailable("espeak-ng", "missing").is_transient());
    }

    #[test]
    fn test_storage_error_keeps_cause() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem");
        let err = StorageError::open("/var/lib/vox/cache.db", io);
        assert!(err.to_string().contains("/var/lib/vox/cache.db"));
        assert!(err.to_string().contains("read-only filesystem"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_speak_error_conversions() {
        let err: SpeakError = SynthesisError::Timeout { timeout: Duration::from_secs(5) }.into();
        assert!(err.is_synthesis());
        assert_eq!(err.to_string(), "synthesis timed out after 5s");

        let err = PlaybackError::Timeout { timeout: Duration::from_millis(250) };
        assert_eq!(err.to_string(), "playback timed out after 250ms");

        let err: SpeakError = StorageError::backend_message("get", "database disk image is malformed").into();
        assert!(err.is_storage());
        assert!(err.to_string().contains("malformed"));

        assert!(SpeakError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_question_mark_propagation() {
        fn inner() -> Result<(), StorageError> {
            Err(StorageError::task("join error"))
        }

        fn outer() -> Result<(), SpeakError> {
            inner()?;
            Ok(())
        }

        assert!(outer().unwrap_err().is_storage());
    }
}
