use melos_core::ports::StoreError;
use thiserror::Error;

/// Errores internos de los adaptadores; hacia el núcleo salen como `StoreError`.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("database error: {0}")]
  Database(#[from] diesel::result::Error),

  #[error("pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),

  #[error("migration error: {0}")]
  Migration(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("document error: {0}")]
  Document(#[from] serde_json::Error),

  #[error("config error: {0}")]
  Config(#[from] melos_config::ConfigError),

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl StorageError {
  pub(crate) fn into_read(self) -> StoreError {
    StoreError::Read(self.to_string())
  }

  pub(crate) fn into_write(self) -> StoreError {
    StoreError::Write(self.to_string())
  }
}
