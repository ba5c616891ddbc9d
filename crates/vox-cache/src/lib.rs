//! # Vox Cache
//!
//! Content-addressable two-tier cache in front of a speech synthesis engine.
//!
//! A request `(text, voice, rate)` maps to a fixed-size key. Audio is looked
//! up in an in-process memory tier, then in a SQLite-backed durable tier, and
//! only synthesized when both miss. Fresh audio is written to both tiers, so
//! a restarted process starts warm from disk.
//!
//! ## Example
//!
//! ```ignore
//! use vox_cache::{Settings, SynthesisCache};
//!
//! let settings = Settings::load()?;
//! let cache = SynthesisCache::from_settings(&settings)?;
//! let audio = cache.speak_text("hello world").await?;
//! ```

pub mod cache;
pub mod cancel;
pub mod metrics;
pub mod session;
pub mod settings;

pub use cache::{AudioStore, MemoryCache, SqliteStore, SynthesisCache, SynthesisCacheBuilder, Tier};
pub use cancel::{CancelHandle, Cancellation, cancellation};
pub use metrics::{CacheMetrics, register_cache_metrics};
pub use settings::Settings;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
