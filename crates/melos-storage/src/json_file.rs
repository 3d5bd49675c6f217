use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use melos_core::domain::Catalog;
use melos_core::ports::{DocumentStore, StoreError};

use crate::error::StorageError;

/// Catálogo en un único fichero JSON.
///
/// Las escrituras pasan por un mutex de proceso y se publican con rename atómico,
/// así que un lector ve o el documento anterior o el nuevo, nunca uno a medias.
#[derive(Clone)]
pub struct JsonFileDocumentStore {
  path: Arc<PathBuf>,
  write_lock: Arc<Mutex<()>>,
}

impl JsonFileDocumentStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: Arc::new(path.into()), write_lock: Arc::new(Mutex::new(())) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

fn read_document(path: &Path) -> Result<Catalog, StorageError> {
  match std::fs::read_to_string(path) {
    Ok(text) if text.trim().is_empty() => Ok(Catalog::default()),
    Ok(text) => Ok(serde_json::from_str(&text)?),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Catalog::default()),
    Err(e) => Err(e.into()),
  }
}

fn write_document(path: &Path, catalog: &Catalog) -> Result<(), StorageError> {
  let json = serde_json::to_string_pretty(catalog)?;
  melos_fs::atomic_write_str(path, &json)?;
  Ok(())
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
  async fn transact<F, T>(&self, mutation: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut Catalog) -> T + Send + 'static,
    T: Send + 'static,
  {
    let _guard = self.write_lock.lock().await;
    let path = Arc::clone(&self.path);

    let result = tokio::task::spawn_blocking(move || -> Result<T, StorageError> {
      let mut catalog = read_document(&path)?;
      let out = mutation(&mut catalog);
      write_document(&path, &catalog)?;
      Ok(out)
    })
    .await
    .map_err(|e| StorageError::from(e).into_write())?;

    result.map_err(StorageError::into_write)
  }

  async fn get_content(&self) -> Result<Catalog, StoreError> {
    let path = Arc::clone(&self.path);
    let result = tokio::task::spawn_blocking(move || read_document(&path))
      .await
      .map_err(|e| StorageError::from(e).into_read())?;

    result.map_err(StorageError::into_read)
  }
}
