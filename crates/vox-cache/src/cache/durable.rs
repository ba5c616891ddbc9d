//! Durable tier trait definition.

use async_trait::async_trait;
use vox_core::{AudioBlob, CacheKey, StorageError};

/// Almacenamiento persistente `CacheKey -> AudioBlob`.
///
/// Una falla de I/O siempre se reporta como `StorageError`, nunca como
/// `Ok(None)`: la ausencia de una key y un backend roto son resultados
/// distintos.
#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Obtiene el audio para la key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(audio))` si la key existe
    /// - `Ok(None)` si la key no existe
    /// - `Err(StorageError)` si el backend fallo
    async fn get(&self, key: &CacheKey) -> Result<Option<AudioBlob>, StorageError>;

    /// Inserta o reemplaza el audio para la key.
    ///
    /// Cuando retorna `Ok`, el valor es visible para cualquier `get`
    /// posterior, incluso desde otra instancia abierta sobre el mismo
    /// almacenamiento.
    async fn put(&self, key: &CacheKey, audio: &AudioBlob) -> Result<(), StorageError>;

    /// Nombre del backend para logging.
    fn name(&self) -> &str;
}
