//! Synthesis engine health tracking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Tracks the outcome of engine runs for health reporting.
#[derive(Debug)]
pub struct EngineState {
    /// Total number of runs attempted.
    runs: AtomicU64,
    /// The time of the last successful run.
    last_success: RwLock<Option<Instant>>,
    /// The last error message, if any.
    last_error: RwLock<Option<String>>,
    /// Number of consecutive failures.
    failure_count: RwLock<u32>,
}

impl EngineState {
    /// Creates a new EngineState.
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            last_success: RwLock::new(None),
            last_error: RwLock::new(None),
            failure_count: RwLock::new(0),
        }
    }

    /// Records a successful run.
    pub fn record_success(&self) {
        let mut last_success = self.last_success.write();
        let mut last_error = self.last_error.write();
        let mut failure_count = self.failure_count.write();

        self.runs.fetch_add(1, Ordering::Relaxed);
        *last_success = Some(Instant::now());
        *last_error = None;
        *failure_count = 0;
    }

    /// Records a failed run.
    pub fn record_failure(&self, error: impl Into<String>) {
        let mut last_error = self.last_error.write();
        let mut failure_count = self.failure_count.write();

        self.runs.fetch_add(1, Ordering::Relaxed);
        *last_error = Some(error.into());
        *failure_count += 1;
    }

    /// Returns the total number of runs.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Returns the number of consecutive failures.
    pub fn failure_count(&self) -> u32 {
        *self.failure_count.read()
    }

    /// Returns the time elapsed since the last successful run.
    pub fn time_since_success(&self) -> Option<Duration> {
        self.last_success.read().map(|t| t.elapsed())
    }

    /// Returns true unless the most recent run failed.
    pub fn is_healthy(&self) -> bool {
        self.last_error.read().is_none()
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = EngineState::new();
        assert_eq!(state.runs(), 0);
        assert!(state.time_since_success().is_none());
        assert!(state.is_healthy());
    }

    #[test]
    fn test_record_failure() {
        let state = EngineState::new();
        state.record_failure("unknown voice");
        state.record_failure("timeout");

        assert_eq!(state.runs(), 2);
        assert_eq!(state.failure_count(), 2);
        assert_eq!(state.last_error(), Some("timeout".to_string()));
        assert!(!state.is_healthy());
    }

    #[test]
    fn test_success_resets_failure() {
        let state = EngineState::new();
        state.record_failure("error 1");
        state.record_failure("error 2");

        state.record_success();
        assert_eq!(state.runs(), 3);
        assert_eq!(state.failure_count(), 0);
        assert!(state.last_error().is_none());
        assert!(state.time_since_success().is_some());
        assert!(state.is_healthy());
    }
}
