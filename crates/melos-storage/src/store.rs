use async_trait::async_trait;

use melos_core::domain::Catalog;
use melos_core::ports::{DocumentStore, StoreError};

use crate::config::{StorageConfig, StoreBackend};
use crate::error::StorageError;
use crate::json_file::JsonFileDocumentStore;
use crate::memory::MemoryDocumentStore;
use crate::sqlite::SqliteDocumentStore;

/// Adaptador elegido en tiempo de arranque según `[storage] backend`.
pub enum CatalogStore {
  Sqlite(SqliteDocumentStore),
  JsonFile(JsonFileDocumentStore),
  Memory(MemoryDocumentStore),
}

impl CatalogStore {
  /// Lee (o crea) la sección `[storage]` y abre el backend configurado.
  pub fn new_from_config() -> Result<Self, StorageError> {
    let cfg = StorageConfig::load()?;
    Self::open(&cfg)
  }

  pub fn open(cfg: &StorageConfig) -> Result<Self, StorageError> {
    let store = match cfg.backend {
      StoreBackend::Sqlite => {
        CatalogStore::Sqlite(SqliteDocumentStore::open(&cfg.db_path, cfg.journal_mode.as_deref(), cfg.busy_timeout_ms)?)
      }
      StoreBackend::Json => CatalogStore::JsonFile(JsonFileDocumentStore::new(&cfg.catalog_path)),
      StoreBackend::Memory => CatalogStore::Memory(MemoryDocumentStore::new()),
    };

    tracing::debug!(backend = ?cfg.backend, "catalog store opened");
    Ok(store)
  }
}

#[async_trait]
impl DocumentStore for CatalogStore {
  async fn transact<F, T>(&self, mutation: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut Catalog) -> T + Send + 'static,
    T: Send + 'static,
  {
    match self {
      CatalogStore::Sqlite(s) => s.transact(mutation).await,
      CatalogStore::JsonFile(s) => s.transact(mutation).await,
      CatalogStore::Memory(s) => s.transact(mutation).await,
    }
  }

  async fn get_content(&self) -> Result<Catalog, StoreError> {
    match self {
      CatalogStore::Sqlite(s) => s.get_content().await,
      CatalogStore::JsonFile(s) => s.get_content().await,
      CatalogStore::Memory(s) => s.get_content().await,
    }
  }
}
