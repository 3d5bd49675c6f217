use melos_config::{CONFIG_BACKEND, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct IngestConfig {
  /// Área gestionada donde acaban todos los audios.
  pub music_dir: PathBuf,

  /// Extensión fija para descargas remotas.
  pub remote_format: String,

  pub request_timeout_secs: u64,

  pub user_agent: String,
}

impl Default for IngestConfig {
  fn default() -> Self {
    IngestConfig {
      music_dir: PATHS.music_dir(),
      remote_format: "mp4".to_string(),
      request_timeout_secs: 60,
      user_agent: format!("melos/{}", env!("CARGO_PKG_VERSION")),
    }
  }
}

impl IngestConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init("ingest")
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs.max(1))
  }
}
