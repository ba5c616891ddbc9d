//! Durable store with injectable failures.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use vox_cache::{AudioStore, SqliteStore};
use vox_core::{AudioBlob, CacheKey, StorageError};

/// Envuelve un `SqliteStore` y puede fallar lecturas o escrituras.
pub struct FlakyStore {
    inner: SqliteStore,
    fail_get: AtomicBool,
    fail_put: AtomicBool,
    gets: AtomicU32,
    puts: AtomicU32,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: SqliteStore::open_in_memory().unwrap(),
            fail_get: AtomicBool::new(false),
            fail_put: AtomicBool::new(false),
            gets: AtomicU32::new(0),
            puts: AtomicU32::new(0),
        })
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Successful plus failed `get` calls.
    pub fn gets(&self) -> u32 {
        self.gets.load(Ordering::SeqCst)
    }

    /// Successful plus failed `put` calls.
    pub fn puts(&self) -> u32 {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &SqliteStore {
        &self.inner
    }
}

#[async_trait]
impl AudioStore for FlakyStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<AudioBlob>, StorageError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(StorageError::backend_message("get", "disk unreadable"));
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &CacheKey, audio: &AudioBlob) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StorageError::backend_message("put", "disk full"));
        }
        self.inner.put(key, audio).await
    }

    fn name(&self) -> &str {
        "flaky"
    }
}
