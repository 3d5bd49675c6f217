use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
  #[error("failed to download {url}: {reason}")]
  FetchFailed { url: String, reason: String },

  #[error("source file not found: {}", .0.display())]
  SourceNotFound(PathBuf),

  #[error("managed storage unavailable: {0}")]
  StorageArea(String),
}

/// Audio reachable over HTTP(S).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSource {
  pub url: String,
  pub title: String,
}

/// Audio sitting somewhere on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
  pub file_path: PathBuf,
  pub file_name: String,
}

/// Origen de un audio; el llamador elige la variante explícitamente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
  Url(UrlSource),
  File(FileSource),
}

/// Resultado de reubicar un audio en el área gestionada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
  /// Valor que acabará en `linkToBucket`.
  pub storage_reference: String,
  pub format: Option<String>,
  pub duration: Option<Duration>,
}

/// Una forma concreta de ingerir audio (URL remota, fichero local, ...).
#[async_trait]
pub trait UploadStrategy: Send + Sync {
  type Source: Send + Sync;

  async fn upload(&self, source: &Self::Source) -> Result<UploadOutcome, IngestionError>;
}

/// Port que la capa de servicio usa para traer audio al área gestionada.
#[async_trait]
pub trait AudioIngestor: Send + Sync {
  async fn upload(&self, source: AudioSource) -> Result<UploadOutcome, IngestionError>;

  /// Removes an asset this ingestor produced. Returns `false` for references outside the
  /// managed area, which are never touched.
  async fn discard(&self, storage_reference: &str) -> Result<bool, IngestionError>;
}
