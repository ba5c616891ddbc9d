//! Metrics module for the Vox synthesis cache.
//!
//! Metrics go through the `metrics` facade; without an installed recorder
//! the macros are no-ops and only the in-process counters are kept.

pub mod cache;

pub use cache::{CacheMetrics, register_cache_metrics};
