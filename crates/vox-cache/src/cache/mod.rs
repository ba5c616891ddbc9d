//! Cache tiers and the synthesis cache orchestrator.
//!
//! Lookups go memory first, then the durable store, then the synthesis
//! engine. Whatever a lower tier returns is promoted to the tiers above it.

mod durable;
mod inflight;
mod memory;
mod sqlite;
mod synthesis_cache;

pub use durable::AudioStore;
pub use memory::MemoryCache;
pub use sqlite::SqliteStore;
pub use synthesis_cache::{SynthesisCache, SynthesisCacheBuilder};

/// Tier que respondio una solicitud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Mapa en memoria del proceso
    Memory,
    /// Store persistente
    Durable,
}

impl Tier {
    /// Nombre usado como label en metricas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Durable => "durable",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
