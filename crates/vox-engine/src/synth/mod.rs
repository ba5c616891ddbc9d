//! Speech synthesis abstraction.
//!
//! This module defines the trait the synthesis cache calls on a full miss,
//! and the espeak-ng implementation of it.

mod espeak;
mod traits;

pub use espeak::EspeakSynthesizer;
pub use traits::SpeechSynthesizer;
