use async_trait::async_trait;

use crate::domain::Catalog;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("store read failed: {0}")]
  Read(String),

  #[error("store write failed: {0}")]
  Write(String),
}

/// Port del almacén de documentos que guarda la colección completa.
///
/// El almacén es el único dueño de los datos: decide la durabilidad, serializa las
/// mutaciones concurrentes y garantiza read-your-writes para un mismo llamador.
/// Implementaciones: SQLite (diesel), fichero JSON, memoria.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  /// Applies `mutation` atomically: either all of its changes become visible or none do.
  async fn transact<F, T>(&self, mutation: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut Catalog) -> T + Send + 'static,
    T: Send + 'static;

  /// Full snapshot of the current collection.
  async fn get_content(&self) -> Result<Catalog, StoreError>;
}
