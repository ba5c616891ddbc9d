//! In-process memory tier using Moka.

use moka::future::Cache;
use vox_core::{AudioBlob, CacheKey};

/// Tier de memoria: mapa concurrente `CacheKey -> AudioBlob`.
///
/// No tiene capacidad maxima ni TTL; una entrada vive lo mismo que la
/// instancia. Los clones comparten el mismo mapa.
///
/// # Examples
///
/// ```no_run
/// use vox_cache::MemoryCache;
/// use vox_core::{AudioBlob, KeyDeriver, SpeechRequest};
///
/// # #[tokio::main]
/// # async fn main() {
/// let memory = MemoryCache::new();
/// let key = KeyDeriver::derive(&SpeechRequest::new("hello", "en-us", "150"));
///
/// memory.put(key, AudioBlob::new(b"RIFF".to_vec())).await;
/// assert!(memory.get(&key).await.is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<CacheKey, AudioBlob>,
}

impl MemoryCache {
    /// Crea un tier de memoria vacio.
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Obtiene el audio para la key, si existe.
    pub async fn get(&self, key: &CacheKey) -> Option<AudioBlob> {
        self.inner.get(key).await
    }

    /// Inserta o reemplaza el audio para la key.
    pub async fn put(&self, key: CacheKey, audio: AudioBlob) {
        self.inner.insert(key, audio).await;
    }

    /// Verifica si la key esta en memoria.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Numero aproximado de entries.
    ///
    /// Moka actualiza este contador de forma diferida; usar
    /// [`MemoryCache::sync`] antes de leerlo cuando se necesita exacto.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Aplica las operaciones pendientes de mantenimiento.
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}
