//! Fake synthesis engine.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use vox_core::{AudioBlob, SpeechRequest, SynthesisError};
use vox_engine::SpeechSynthesizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Returns `expected_audio(request)`
    Echo,
    /// Fails with `SynthesisError::Failed`
    Fail,
    /// Returns an empty buffer
    Empty,
}

/// Audio the fake engine produces for a request.
pub fn expected_audio(request: &SpeechRequest) -> Vec<u8> {
    let mut audio = b"RIFF".to_vec();
    audio.extend_from_slice(
        format!("{}|{}|{}", request.voice(), request.rate(), request.text()).as_bytes(),
    );
    audio
}

/// Sintetizador que cuenta llamadas y puede demorar o fallar.
pub struct FakeSynth {
    started: AtomicU32,
    completed: AtomicU32,
    delay: Option<Duration>,
    behavior: Mutex<Behavior>,
}

impl FakeSynth {
    pub fn new() -> Arc<Self> {
        Self::build(None, Behavior::Echo)
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Self::build(Some(delay), Behavior::Echo)
    }

    pub fn with_behavior(behavior: Behavior) -> Arc<Self> {
        Self::build(None, behavior)
    }

    fn build(delay: Option<Duration>, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicU32::new(0),
            completed: AtomicU32::new(0),
            delay,
            behavior: Mutex::new(behavior),
        })
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock() = behavior;
    }

    /// Synthesis calls that started.
    pub fn calls(&self) -> u32 {
        self.started.load(Ordering::SeqCst)
    }

    /// Synthesis calls that ran to completion.
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynth {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioBlob, SynthesisError> {
        self.started.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let behavior = *self.behavior.lock();
        self.completed.fetch_add(1, Ordering::SeqCst);

        match behavior {
            Behavior::Echo => Ok(AudioBlob::new(expected_audio(request))),
            Behavior::Fail => Err(SynthesisError::failed("fake", Some(1), "engine exploded")),
            Behavior::Empty => Ok(AudioBlob::new(Vec::new())),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}
