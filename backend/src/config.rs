use melos_config::{CONFIG_BACKEND, ConfigError};
use melos_core::fingerprint::FingerprintMode;
use melos_ingest::IngestConfig;
use melos_storage::{StorageConfig, StoreBackend};
use serde::{Deserialize, Serialize};

/// Sección `[fingerprint]`: cómo se calcula el `audioHash`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
  pub mode: FingerprintMode,
}

impl FingerprintConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init("fingerprint")
  }
}

/// Vista plana de la configuración efectiva para el comando `config`.
#[derive(Debug, Serialize)]
pub struct ConfigDto {
  pub config_file: String,
  pub storage_backend: StoreBackend,
  pub db_path: String,
  pub catalog_path: String,
  pub music_dir: String,
  pub remote_format: String,
  pub request_timeout_secs: u64,
  pub fingerprint_mode: FingerprintMode,
}

impl ConfigDto {
  pub fn load() -> Result<Self, ConfigError> {
    let storage = StorageConfig::load()?;
    let ingest = IngestConfig::load()?;
    let fingerprint = FingerprintConfig::load()?;
    Ok(Self::from_parts(&storage, &ingest, &fingerprint))
  }

  fn from_parts(storage: &StorageConfig, ingest: &IngestConfig, fingerprint: &FingerprintConfig) -> Self {
    ConfigDto {
      config_file: CONFIG_BACKEND.path().to_string_lossy().to_string(),
      storage_backend: storage.backend,
      db_path: storage.db_path.to_string_lossy().to_string(),
      catalog_path: storage.catalog_path.to_string_lossy().to_string(),
      music_dir: ingest.music_dir.to_string_lossy().to_string(),
      remote_format: ingest.remote_format.clone(),
      request_timeout_secs: ingest.request_timeout_secs,
      fingerprint_mode: fingerprint.mode,
    }
  }
}
