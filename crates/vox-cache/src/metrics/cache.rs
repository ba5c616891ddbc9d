//! Cache metrics recording.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::cache::Tier;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("vox_cache_hits_total", "Total number of cache hits by tier");
    metrics::describe_counter!(
        "vox_cache_misses_total",
        "Total number of lookups that missed both tiers"
    );
    metrics::describe_counter!(
        "vox_cache_coalesced_total",
        "Misses answered by another caller's synthesis"
    );
    metrics::describe_counter!(
        "vox_synthesis_total",
        "Total number of synthesis engine calls by outcome"
    );
    metrics::describe_counter!(
        "vox_store_write_failures_total",
        "Durable writes that failed after a successful synthesis"
    );
    metrics::describe_histogram!(
        "vox_cache_operation_seconds",
        "Time spent resolving speech requests"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para maximo rendimiento; los clones
/// comparten los mismos contadores.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    memory_hits: Arc<AtomicU64>,
    durable_hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    coalesced: Arc<AtomicU64>,
    syntheses: Arc<AtomicU64>,
    synthesis_failures: Arc<AtomicU64>,
    store_write_failures: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un hit en el tier dado
    pub fn record_hit(&self, tier: Tier) {
        match tier {
            Tier::Memory => self.memory_hits.fetch_add(1, Ordering::Relaxed),
            Tier::Durable => self.durable_hits.fetch_add(1, Ordering::Relaxed),
        };
        counter!("vox_cache_hits_total", "tier" => tier.as_str()).increment(1);
    }

    /// Registra un miss en ambos tiers
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("vox_cache_misses_total").increment(1);
    }

    /// Registra un miss resuelto por la sintesis de otro caller
    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
        counter!("vox_cache_coalesced_total").increment(1);
    }

    /// Registra una sintesis exitosa
    pub fn record_synthesis(&self) {
        self.syntheses.fetch_add(1, Ordering::Relaxed);
        counter!("vox_synthesis_total", "outcome" => "success").increment(1);
    }

    /// Registra una sintesis fallida
    pub fn record_synthesis_failure(&self) {
        self.synthesis_failures.fetch_add(1, Ordering::Relaxed);
        counter!("vox_synthesis_total", "outcome" => "failure").increment(1);
    }

    /// Registra una escritura durable fallida
    pub fn record_store_write_failure(&self) {
        self.store_write_failures.fetch_add(1, Ordering::Relaxed);
        counter!("vox_store_write_failures_total").increment(1);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("vox_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate sobre ambos tiers (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = (self.memory_hits() + self.durable_hits()) as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits en memoria
    pub fn memory_hits(&self) -> u64 {
        self.memory_hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de hits en el tier durable
    pub fn durable_hits(&self) -> u64 {
        self.durable_hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses resueltos por otro caller
    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }

    /// Retorna el numero de sintesis exitosas
    pub fn syntheses(&self) -> u64 {
        self.syntheses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de sintesis fallidas
    pub fn synthesis_failures(&self) -> u64 {
        self.synthesis_failures.load(Ordering::Relaxed)
    }

    /// Retorna el numero de escrituras durables fallidas
    pub fn store_write_failures(&self) -> u64 {
        self.store_write_failures.load(Ordering::Relaxed)
    }
}
