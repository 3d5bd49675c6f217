use std::path::{Path, PathBuf};

use async_trait::async_trait;

use melos_core::ports::{FileSource, IngestionError, UploadOutcome, UploadStrategy};
use melos_fs::{ensure_dir, reserve_unique, source_file_name};

use crate::url::{fs_storage_area, storage_area};

/// Copia un fichero local al área gestionada.
pub struct FileUploadStrategy {
  music_dir: PathBuf,
}

impl FileUploadStrategy {
  pub fn new(music_dir: impl Into<PathBuf>) -> Self {
    Self { music_dir: music_dir.into() }
  }

  pub fn music_dir(&self) -> &Path {
    &self.music_dir
  }
}

fn format_of(path: &Path) -> String {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .filter(|ext| !ext.is_empty())
    .map(str::to_string)
    .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl UploadStrategy for FileUploadStrategy {
  type Source = FileSource;

  async fn upload(&self, source: &FileSource) -> Result<UploadOutcome, IngestionError> {
    // Nada se crea en disco si el origen no existe.
    let is_file = tokio::fs::metadata(&source.file_path).await.map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
      return Err(IngestionError::SourceNotFound(source.file_path.clone()));
    }

    let file_name = source_file_name(&source.file_name).map_err(fs_storage_area)?;

    ensure_dir(&self.music_dir).await.map_err(|e| storage_area(&self.music_dir, e))?;
    let reserved = reserve_unique(&self.music_dir, &file_name).await.map_err(fs_storage_area)?;
    let destination = reserved.path;
    drop(reserved.file);

    if let Err(e) = tokio::fs::copy(&source.file_path, &destination).await {
      if let Err(cleanup) = tokio::fs::remove_file(&destination).await {
        tracing::warn!(path = %destination.display(), error = %cleanup, "could not remove partial copy");
      }
      return Err(storage_area(&destination, e));
    }

    tracing::debug!(from = %source.file_path.display(), to = %destination.display(), "local audio copied");

    Ok(UploadOutcome {
      format: Some(format_of(&destination)),
      storage_reference: destination.to_string_lossy().into_owned(),
      duration: None,
    })
  }
}
