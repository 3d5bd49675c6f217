// crates/melos-core/src/errors.rs
use thiserror::Error;

use crate::domain::{AudioHash, ValidationError};
use crate::ports::{IngestionError, RepoError, StoreError};
use crate::query::QueryError;

/// Error genérico del núcleo de melos.
///
/// Las capas superiores (CLI, un futuro servidor, etc.) deberían mapear este error
/// a mensajes de usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("invalid input: {0}")]
  Validation(#[from] ValidationError),

  #[error("invalid query: {0}")]
  Query(#[from] QueryError),

  #[error("ingestion error: {0}")]
  Ingestion(#[from] IngestionError),

  #[error("storage error: {0}")]
  Storage(#[from] StoreError),

  #[error("not implemented: {0}")]
  NotImplemented(&'static str),

  #[error("not found")]
  NotFound,

  #[error("{count} songs share audio hash {audio_hash}")]
  AmbiguousIdentity { audio_hash: AudioHash, count: usize },
}

impl From<RepoError> for CoreError {
  fn from(err: RepoError) -> Self {
    match err {
      RepoError::Storage(e) => CoreError::Storage(e),
      RepoError::NotImplemented(what) => CoreError::NotImplemented(what),
    }
  }
}
