//! SQLite-backed durable tier.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::{debug, info};
use vox_core::{AudioBlob, CacheKey, StorageError};

use super::AudioStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS audio_cache (
    key        BLOB PRIMARY KEY NOT NULL,
    audio      BLOB NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
) WITHOUT ROWID;
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Tier durable sobre un archivo SQLite.
///
/// Cada operacion corre en `spawn_blocking` con la conexion detras de un
/// mutex; las escrituras usan transacciones `IMMEDIATE` para que otro
/// proceso sobre el mismo archivo vea el valor completo o nada.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Abre (o crea) el store en `path`.
    ///
    /// Crea los directorios padre y la tabla si no existen. Abrir un store
    /// ya inicializado no modifica su contenido.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::open(path.clone(), e))?;
        }

        let conn = Connection::open(&path).map_err(|e| StorageError::open(path.clone(), e))?;
        Self::init(&conn, true).map_err(|e| StorageError::open(path.clone(), e))?;

        info!(path = %path.display(), "Audio store opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Abre un store en memoria, util para tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::open(":memory:", e))?;
        Self::init(&conn, false).map_err(|e| StorageError::open(":memory:", e))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    fn init(conn: &Connection, wal: bool) -> rusqlite::Result<()> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        if wal {
            let mode: String =
                conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            debug!(journal_mode = %mode, "Audio store journal mode");
        }
        conn.execute_batch(SCHEMA)
    }

    /// Ruta del archivo, `None` para stores en memoria.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Numero de entries persistidas.
    pub async fn len(&self) -> Result<u64, StorageError> {
        self.run("len", |conn| {
            conn.query_row("SELECT COUNT(*) FROM audio_cache", [], |row| {
                row.get::<_, i64>(0)
            })
        })
        .await
        .map(|count| count.max(0) as u64)
    }

    /// Verifica si el store no tiene entries.
    pub async fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len().await? == 0)
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            f(&mut conn)
        })
        .await
        .map_err(|e| StorageError::task(e.to_string()))?
        .map_err(|e| StorageError::backend(operation, e))
    }
}

#[async_trait]
impl AudioStore for SqliteStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<AudioBlob>, StorageError> {
        let key = *key;

        let audio = self
            .run("get", move |conn| {
                conn.query_row(
                    "SELECT audio FROM audio_cache WHERE key = ?1",
                    params![&key.as_bytes()[..]],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()
            })
            .await?;

        Ok(audio.map(AudioBlob::from))
    }

    async fn put(&self, key: &CacheKey, audio: &AudioBlob) -> Result<(), StorageError> {
        let key = *key;
        let audio = audio.clone();

        self.run("put", move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "INSERT OR REPLACE INTO audio_cache (key, audio) VALUES (?1, ?2)",
                params![&key.as_bytes()[..], audio.as_bytes()],
            )?;
            tx.commit()
        })
        .await
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish()
    }
}
