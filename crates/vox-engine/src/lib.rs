//! # Vox Engine
//!
//! Synthesis and playback collaborators for the Vox synthesis cache.
//!
//! The cache itself never knows how audio is produced or played. This crate
//! provides the trait seams it depends on, plus the default implementations
//! that drive external programs.
//!
//! ## Features
//!
//! - Async trait-based synthesis abstraction (`SpeechSynthesizer`)
//! - espeak-ng backend that streams text over stdin and reads WAV from stdout
//! - Command-line audio players (`aplay`, `paplay`, `ffplay`, ...)
//! - Timeouts with child termination, engine health tracking
//!
//! ## Example
//!
//! ```ignore
//! use vox_core::SpeechRequest;
//! use vox_engine::{EspeakConfig, EspeakSynthesizer, SpeechSynthesizer};
//!
//! let engine = EspeakSynthesizer::new(EspeakConfig::default());
//! let audio = engine
//!     .synthesize(&SpeechRequest::new("hello", "en-us", "150"))
//!     .await?;
//! ```

pub mod config;
pub mod playback;
mod process;
pub mod state;
pub mod synth;

// Re-exports
pub use config::{EspeakConfig, EspeakConfigBuilder, PlayerConfig, PlayerConfigBuilder};
pub use playback::{AudioPlayer, CommandPlayer};
pub use state::EngineState;
pub use synth::{EspeakSynthesizer, SpeechSynthesizer};

// Re-export vox_core for consumers
pub use vox_core;
