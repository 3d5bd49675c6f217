use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use melos_config::ConfigError;
use melos_core::ports::{
  AudioIngestor, AudioSource, FileSource, IngestionError, UploadOutcome, UploadStrategy, UrlSource,
};

use crate::config::IngestConfig;
use crate::file::FileUploadStrategy;
use crate::url::{UrlUploadStrategy, storage_area};

#[derive(Debug, Error)]
pub enum IngestSetupError {
  #[error("config error: {0}")]
  Config(#[from] ConfigError),

  #[error("http client error: {0}")]
  Http(#[from] reqwest::Error),
}

/// Implementación de `AudioIngestor` sobre un directorio local.
///
/// Ambas estrategias escriben en el mismo `music_dir`; `discard` sólo borra lo que está
/// dentro de él.
pub struct ManagedIngestor {
  music_dir: PathBuf,
  url: UrlUploadStrategy,
  file: FileUploadStrategy,
}

impl ManagedIngestor {
  pub fn new(client: reqwest::Client, music_dir: impl Into<PathBuf>, remote_format: impl Into<String>) -> Self {
    let music_dir = music_dir.into();
    Self {
      url: UrlUploadStrategy::new(client, music_dir.clone(), remote_format),
      file: FileUploadStrategy::new(music_dir.clone()),
      music_dir,
    }
  }

  pub fn from_config(cfg: &IngestConfig) -> Result<Self, IngestSetupError> {
    let client = reqwest::Client::builder().user_agent(&cfg.user_agent).timeout(cfg.request_timeout()).build()?;

    tracing::debug!(music_dir = %cfg.music_dir.display(), format = %cfg.remote_format, "ingestor ready");
    Ok(Self::new(client, cfg.music_dir.clone(), cfg.remote_format.clone()))
  }

  /// Lee (o crea) la sección `[ingest]` y construye el ingestor.
  pub fn new_from_config() -> Result<Self, IngestSetupError> {
    Self::from_config(&IngestConfig::load()?)
  }

  pub fn music_dir(&self) -> &Path {
    &self.music_dir
  }

  pub async fn upload_from_url(&self, source: &UrlSource) -> Result<UploadOutcome, IngestionError> {
    self.url.upload(source).await
  }

  pub async fn upload_from_file(&self, source: &FileSource) -> Result<UploadOutcome, IngestionError> {
    self.file.upload(source).await
  }
}

#[async_trait]
impl AudioIngestor for ManagedIngestor {
  async fn upload(&self, source: AudioSource) -> Result<UploadOutcome, IngestionError> {
    match &source {
      AudioSource::Url(src) => self.upload_from_url(src).await,
      AudioSource::File(src) => self.upload_from_file(src).await,
    }
  }

  async fn discard(&self, storage_reference: &str) -> Result<bool, IngestionError> {
    let path = Path::new(storage_reference);
    if !melos_fs::is_within(&self.music_dir, path) {
      return Ok(false);
    }

    tokio::fs::remove_file(path).await.map_err(|e| storage_area(path, e))?;
    tracing::debug!(path = %path.display(), "managed asset removed");
    Ok(true)
  }
}
