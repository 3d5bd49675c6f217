use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use melos_core::ports::{IngestionError, UploadOutcome, UploadStrategy, UrlSource};
use melos_fs::{FsError, ensure_dir, reserve_unique, sanitize_title};

/// Descarga un audio remoto al área gestionada.
///
/// El cuerpo se lee entero antes de reservar el destino: si la descarga falla no queda
/// ningún fichero en disco.
pub struct UrlUploadStrategy {
  client: reqwest::Client,
  music_dir: PathBuf,
  format: String,
}

impl UrlUploadStrategy {
  pub fn new(client: reqwest::Client, music_dir: impl Into<PathBuf>, format: impl Into<String>) -> Self {
    Self { client, music_dir: music_dir.into(), format: format.into() }
  }

  pub fn music_dir(&self) -> &Path {
    &self.music_dir
  }

  async fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestionError> {
    let failed = |reason: String| IngestionError::FetchFailed { url: url.to_string(), reason };

    let response = self.client.get(url).send().await.map_err(|e| failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      return Err(failed(status.to_string()));
    }

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    Ok(bytes.to_vec())
  }
}

#[async_trait]
impl UploadStrategy for UrlUploadStrategy {
  type Source = UrlSource;

  async fn upload(&self, source: &UrlSource) -> Result<UploadOutcome, IngestionError> {
    ensure_dir(&self.music_dir).await.map_err(|e| storage_area(&self.music_dir, e))?;

    let payload = self.fetch(&source.url).await?;
    tracing::debug!(url = %source.url, bytes = payload.len(), "remote audio fetched");

    let suffix = format!("{}.{}", sanitize_title(&source.title), self.format);
    let mut reserved = reserve_unique(&self.music_dir, &suffix).await.map_err(fs_storage_area)?;

    let written = async {
      reserved.file.write_all(&payload).await?;
      reserved.file.flush().await?;
      reserved.file.sync_all().await
    }
    .await;

    if let Err(e) = written {
      drop(reserved.file);
      if let Err(cleanup) = tokio::fs::remove_file(&reserved.path).await {
        tracing::warn!(path = %reserved.path.display(), error = %cleanup, "could not remove partial download");
      }
      return Err(storage_area(&reserved.path, e));
    }

    Ok(UploadOutcome {
      storage_reference: reserved.path.to_string_lossy().into_owned(),
      format: Some(self.format.clone()),
      duration: None,
    })
  }
}

pub(crate) fn storage_area(path: &Path, err: std::io::Error) -> IngestionError {
  IngestionError::StorageArea(format!("{}: {err}", path.display()))
}

pub(crate) fn fs_storage_area(err: FsError) -> IngestionError {
  IngestionError::StorageArea(err.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::serve_once;
  use tempfile::tempdir;

  fn strategy(dir: &Path) -> UrlUploadStrategy {
    UrlUploadStrategy::new(reqwest::Client::new(), dir.join("music"), "mp4")
  }

  fn files_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
      Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
      Err(_) => vec![],
    }
  }

  #[tokio::test]
  async fn success_writes_payload_under_a_timestamped_name() {
    let tmp = tempdir().unwrap();
    let url = serve_once("200 OK", b"fake audio bytes").await;
    let strategy = strategy(tmp.path());

    let outcome = strategy.upload(&UrlSource { url, title: "My  Night Drive".into() }).await.unwrap();

    let path = PathBuf::from(&outcome.storage_reference);
    assert_eq!(path.parent().unwrap(), strategy.music_dir());
    assert!(path.file_name().unwrap().to_string_lossy().ends_with("-My_Night_Drive.mp4"));
    assert_eq!(std::fs::read(&path).unwrap(), b"fake audio bytes");
    assert_eq!(outcome.format.as_deref(), Some("mp4"));
    assert_eq!(outcome.duration, None);
  }

  #[tokio::test]
  async fn non_success_status_fails_without_writing() {
    let tmp = tempdir().unwrap();
    let url = serve_once("404 Not Found", b"nope").await;
    let strategy = strategy(tmp.path());

    let err = strategy.upload(&UrlSource { url, title: "Missing".into() }).await.unwrap_err();

    match err {
      IngestionError::FetchFailed { reason, .. } => assert!(reason.contains("404"), "{reason}"),
      other => panic!("unexpected error: {other:?}"),
    }
    assert!(files_in(strategy.music_dir()).is_empty());
  }

  #[tokio::test]
  async fn unreachable_host_is_a_fetch_failure() {
    let tmp = tempdir().unwrap();
    // Puerto reservado y liberado: nadie escucha ahí.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = format!("http://127.0.0.1:{port}/song.mp4");
    let err = strategy(tmp.path()).upload(&UrlSource { url, title: "x".into() }).await.unwrap_err();

    assert!(matches!(err, IngestionError::FetchFailed { .. }));
  }
}
