use melos_config::{CONFIG_BACKEND, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Qué adaptador guarda el catálogo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
  #[default]
  Sqlite,
  Json,
  Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
  pub backend: StoreBackend,
  /// Base de datos SQLite (backend `sqlite`).
  pub db_path: PathBuf,
  /// Documento JSON (backend `json`).
  pub catalog_path: PathBuf,
  pub journal_mode: Option<String>,
  pub busy_timeout_ms: u32,
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig {
      backend: StoreBackend::default(),
      db_path: PATHS.data_dir.join("melos.db"),
      catalog_path: PATHS.data_dir.join("catalog.json"),
      journal_mode: Some("WAL".to_string()),
      busy_timeout_ms: 5_000,
    }
  }
}

impl StorageConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init("storage")
  }
}
