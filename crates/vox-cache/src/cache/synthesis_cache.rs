//! Synthesis cache orchestrator.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use vox_core::{
    AudioBlob, CacheKey, KeyDeriver, Rate, SpeakError, SpeechRequest, StorageError,
    SynthesisError, Voice,
};
use vox_engine::{EspeakSynthesizer, SpeechSynthesizer};

use super::inflight::InFlight;
use super::{AudioStore, MemoryCache, SqliteStore, Tier};
use crate::cancel::Cancellation;
use crate::metrics::CacheMetrics;
use crate::settings::Settings;

/// Cache de sintesis de dos tiers.
///
/// Resuelve cada solicitud por memoria, luego por el store durable y solo
/// al final invoca el motor de sintesis. El audio sintetizado se escribe
/// primero en el store durable y despues en memoria.
///
/// Solicitudes concurrentes para la misma key comparten una sola sintesis:
/// el primer caller sintetiza, el resto espera y lee el resultado de los
/// tiers.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vox_cache::{SqliteStore, SynthesisCache};
/// use vox_core::SpeechRequest;
/// use vox_engine::{EspeakConfig, EspeakSynthesizer};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = SynthesisCache::builder()
///     .store(Arc::new(SqliteStore::open("vox_cache.db")?))
///     .synthesizer(Arc::new(EspeakSynthesizer::new(EspeakConfig::default())))
///     .build()?;
///
/// let audio = cache.speak(&SpeechRequest::new("hello", "en-us", "150")).await?;
/// println!("{} bytes", audio.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SynthesisCache {
    memory: MemoryCache,
    store: Arc<dyn AudioStore>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    inflight: InFlight,
    metrics: CacheMetrics,
    voice: Voice,
    rate: Rate,
}

impl SynthesisCache {
    /// Crea un nuevo builder.
    pub fn builder() -> SynthesisCacheBuilder {
        SynthesisCacheBuilder::default()
    }

    /// Construye el cache con un `SqliteStore` y un `EspeakSynthesizer`
    /// segun la configuracion.
    pub fn from_settings(settings: &Settings) -> Result<Self, StorageError> {
        let store = SqliteStore::open(&settings.storage_path)?;

        Ok(Self {
            memory: MemoryCache::new(),
            store: Arc::new(store),
            synthesizer: Arc::new(EspeakSynthesizer::new(settings.engine.clone())),
            inflight: InFlight::new(),
            metrics: CacheMetrics::new(),
            voice: settings.voice.clone(),
            rate: settings.rate.clone(),
        })
    }

    /// Obtiene el audio para la solicitud, sintetizando solo si ningun
    /// tier lo tiene.
    ///
    /// # Errors
    ///
    /// - `SpeakError::Synthesis` si el motor falla; no se cachea nada
    /// - `SpeakError::Storage` si la lectura del store durable falla
    pub async fn speak(&self, request: &SpeechRequest) -> Result<AudioBlob, SpeakError> {
        self.resolve(request, Cancellation::never()).await
    }

    /// Igual que [`speak`](Self::speak) con la voz y velocidad por defecto.
    pub async fn speak_text(&self, text: &str) -> Result<AudioBlob, SpeakError> {
        let request = SpeechRequest::new(text, self.voice.clone(), self.rate.clone());
        self.speak(&request).await
    }

    /// Igual que [`speak`](Self::speak), pero retorna
    /// `SpeakError::Cancelled` si la senal se dispara antes de que termine
    /// la sintesis. Una solicitud cancelada no escribe en ningun tier.
    pub async fn speak_cancellable(
        &self,
        request: &SpeechRequest,
        cancel: Cancellation,
    ) -> Result<AudioBlob, SpeakError> {
        self.resolve(request, cancel).await
    }

    async fn resolve(
        &self,
        request: &SpeechRequest,
        mut cancel: Cancellation,
    ) -> Result<AudioBlob, SpeakError> {
        if cancel.is_cancelled() {
            return Err(SpeakError::Cancelled);
        }

        let start = Instant::now();
        let key = KeyDeriver::derive(request);

        if let Some(audio) = self.lookup(&key).await? {
            self.metrics.record_operation_duration("speak_hit", start.elapsed());
            return Ok(audio);
        }

        self.metrics.record_miss();
        debug!(key = %key.short(), "Cache miss on both tiers");

        let _slot = until_cancelled(&mut cancel, self.inflight.acquire(key)).await?;

        // Otro caller pudo completar la sintesis mientras esperabamos
        if let Some(audio) = self.recheck(&key).await? {
            self.metrics.record_coalesced();
            debug!(key = %key.short(), "Miss answered by concurrent synthesis");
            self.metrics.record_operation_duration("speak_coalesced", start.elapsed());
            return Ok(audio);
        }

        let audio = until_cancelled(&mut cancel, self.synthesize(&key, request)).await??;

        if let Err(e) = self.store.put(&key, &audio).await {
            self.metrics.record_store_write_failure();
            warn!(
                key = %key.short(),
                store = self.store.name(),
                error = %e,
                "Durable write failed, audio kept in memory only"
            );
        }
        self.memory.put(key, audio.clone()).await;

        self.metrics.record_operation_duration("speak_synthesized", start.elapsed());
        Ok(audio)
    }

    /// Busca en memoria y luego en el store durable, promoviendo los hits
    /// durables a memoria.
    async fn lookup(&self, key: &CacheKey) -> Result<Option<AudioBlob>, SpeakError> {
        if let Some(audio) = self.memory.get(key).await {
            self.metrics.record_hit(Tier::Memory);
            debug!(key = %key.short(), tier = %Tier::Memory, "Cache hit");
            return Ok(Some(audio));
        }

        let audio = self.load_durable(key).await?;
        if audio.is_some() {
            self.metrics.record_hit(Tier::Durable);
            debug!(key = %key.short(), tier = %Tier::Durable, "Cache hit");
        }
        Ok(audio)
    }

    async fn recheck(&self, key: &CacheKey) -> Result<Option<AudioBlob>, SpeakError> {
        if let Some(audio) = self.memory.get(key).await {
            return Ok(Some(audio));
        }
        self.load_durable(key).await
    }

    async fn load_durable(&self, key: &CacheKey) -> Result<Option<AudioBlob>, SpeakError> {
        match self.store.get(key).await {
            Ok(Some(audio)) => {
                self.memory.put(*key, audio.clone()).await;
                Ok(Some(audio))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(
                    key = %key.short(),
                    store = self.store.name(),
                    error = %e,
                    "Durable read failed"
                );
                Err(e.into())
            }
        }
    }

    async fn synthesize(
        &self,
        key: &CacheKey,
        request: &SpeechRequest,
    ) -> Result<AudioBlob, SynthesisError> {
        let engine = self.synthesizer.name();
        info!(key = %key.short(), engine, "Synthesizing {}", request);

        let result = match self.synthesizer.synthesize(request).await {
            Ok(audio) if audio.is_empty() => Err(SynthesisError::empty_output(engine)),
            other => other,
        };

        match &result {
            Ok(audio) => {
                self.metrics.record_synthesis();
                debug!(key = %key.short(), bytes = audio.len(), "Synthesis complete");
            }
            Err(e) => {
                self.metrics.record_synthesis_failure();
                warn!(key = %key.short(), engine, error = %e, "Synthesis failed");
            }
        }

        result
    }

    /// Estado del motor de sintesis.
    ///
    /// No toca ningun tier; un motor caido no impide servir audio cacheado.
    pub async fn engine_health(&self) -> Result<(), SynthesisError> {
        self.synthesizer.health_check().await
    }

    /// Key que usaria `speak` para la solicitud.
    pub fn key_for(&self, request: &SpeechRequest) -> CacheKey {
        KeyDeriver::derive(request)
    }

    /// Tier de memoria.
    pub fn memory(&self) -> &MemoryCache {
        &self.memory
    }

    /// Store durable.
    pub fn store(&self) -> &Arc<dyn AudioStore> {
        &self.store
    }

    /// Metricas del cache.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Voz por defecto de `speak_text`.
    pub fn default_voice(&self) -> &Voice {
        &self.voice
    }

    /// Velocidad por defecto de `speak_text`.
    pub fn default_rate(&self) -> &Rate {
        &self.rate
    }

    #[cfg(test)]
    pub(crate) fn pending_slots(&self) -> usize {
        self.inflight.len()
    }
}

async fn until_cancelled<F: Future>(
    cancel: &mut Cancellation,
    fut: F,
) -> Result<F::Output, SpeakError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SpeakError::Cancelled),
        output = fut => Ok(output),
    }
}

impl std::fmt::Debug for SynthesisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisCache")
            .field("memory", &self.memory)
            .field("store", &self.store.name())
            .field("synthesizer", &self.synthesizer.name())
            .field("voice", &self.voice)
            .field("rate", &self.rate)
            .finish()
    }
}

/// Builder para SynthesisCache.
#[derive(Default)]
pub struct SynthesisCacheBuilder {
    memory: Option<MemoryCache>,
    store: Option<Arc<dyn AudioStore>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    metrics: Option<CacheMetrics>,
    voice: Voice,
    rate: Rate,
}

impl SynthesisCacheBuilder {
    /// Usa un tier de memoria existente (por defecto uno vacio).
    pub fn memory(mut self, memory: MemoryCache) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Store durable (requerido).
    pub fn store(mut self, store: Arc<dyn AudioStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Motor de sintesis (requerido).
    pub fn synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Comparte contadores con otro componente.
    pub fn metrics(mut self, metrics: CacheMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Voz por defecto de `speak_text`.
    pub fn voice(mut self, voice: impl Into<Voice>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Velocidad por defecto de `speak_text`.
    pub fn rate(mut self, rate: impl Into<Rate>) -> Self {
        self.rate = rate.into();
        self
    }

    /// Construye el cache.
    pub fn build(self) -> Result<SynthesisCache, &'static str> {
        let store = self.store.ok_or("store is required")?;
        let synthesizer = self.synthesizer.ok_or("synthesizer is required")?;

        Ok(SynthesisCache {
            memory: self.memory.unwrap_or_default(),
            store,
            synthesizer,
            inflight: InFlight::new(),
            metrics: self.metrics.unwrap_or_default(),
            voice: self.voice,
            rate: self.rate,
        })
    }
}
