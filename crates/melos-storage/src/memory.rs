use async_trait::async_trait;
use tokio::sync::RwLock;

use melos_core::domain::{Catalog, Song};
use melos_core::ports::{DocumentStore, StoreError};

/// Almacén volátil: se pierde al cerrar el proceso.
#[derive(Default)]
pub struct MemoryDocumentStore {
  catalog: RwLock<Catalog>,
}

impl MemoryDocumentStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_songs(songs: Vec<Song>) -> Self {
    Self { catalog: RwLock::new(Catalog::new(songs)) }
  }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
  async fn transact<F, T>(&self, mutation: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut Catalog) -> T + Send + 'static,
    T: Send + 'static,
  {
    let mut guard = self.catalog.write().await;
    // Se muta una copia: si `mutation` entra en pánico el catálogo publicado no cambia.
    let mut draft = guard.clone();
    let out = mutation(&mut draft);
    *guard = draft;
    Ok(out)
  }

  async fn get_content(&self) -> Result<Catalog, StoreError> {
    Ok(self.catalog.read().await.clone())
  }
}
