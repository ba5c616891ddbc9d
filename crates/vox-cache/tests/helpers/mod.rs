//! Test helpers para vox-cache.

#![allow(dead_code, unused_imports)]

pub mod store;
pub mod synth;

pub use store::FlakyStore;
pub use synth::{FakeSynth, expected_audio};

use std::sync::Arc;
use vox_cache::{AudioStore, SqliteStore, SynthesisCache};
use vox_engine::SpeechSynthesizer;

/// Cache con store SQLite en memoria y el sintetizador dado.
pub fn cache_with(synth: Arc<FakeSynth>) -> SynthesisCache {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    cache_with_store(synth, store)
}

/// Cache sobre un store y sintetizador existentes.
pub fn cache_with_store(synth: Arc<FakeSynth>, store: Arc<dyn AudioStore>) -> SynthesisCache {
    SynthesisCache::builder()
        .store(store)
        .synthesizer(synth as Arc<dyn SpeechSynthesizer>)
        .build()
        .unwrap()
}
