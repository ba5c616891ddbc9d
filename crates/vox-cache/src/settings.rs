//! Layered configuration for the `vox` binary.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use vox_core::{Rate, Voice};
use vox_engine::{EspeakConfig, PlayerConfig};

/// Configuracion completa del cache y sus colaboradores.
///
/// Las fuentes se aplican en orden: defaults, archivo `vox.toml`
/// (opcional) o el archivo indicado, y variables de entorno `VOX_*` con
/// `__` para campos anidados (`VOX_ENGINE__TIMEOUT=10`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Voz por defecto
    #[serde(default)]
    pub voice: Voice,

    /// Velocidad por defecto
    #[serde(default)]
    pub rate: Rate,

    /// Archivo SQLite del tier durable
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Motor de sintesis
    #[serde(default)]
    pub engine: EspeakConfig,

    /// Reproductor de audio
    #[serde(default)]
    pub player: PlayerConfig,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("vox_cache.db")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            voice: Voice::default(),
            rate: Rate::default(),
            storage_path: default_storage_path(),
            engine: EspeakConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl Settings {
    /// Carga `vox.toml` del directorio actual si existe, mas el entorno.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Carga desde un archivo explicito (requerido) o `vox.toml` (opcional),
    /// mas el entorno.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder();

        let builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("vox").required(false)),
        };

        builder
            .add_source(
                Environment::with_prefix("VOX")
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("player.args")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parsea configuracion TOML sin consultar el entorno.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
