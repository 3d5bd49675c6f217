use async_trait::async_trait;

use crate::domain::{NewSong, Song};
use crate::ports::document_store::StoreError;
use crate::query::SongQuery;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
  #[error("storage error: {0}")]
  Storage(#[from] StoreError),

  #[error("{0} is not implemented")]
  NotImplemented(&'static str),
}

#[async_trait]
pub trait SongRepository: Send + Sync {
  /// Assigns the fingerprint, appends the record and returns it complete.
  async fn create_song(&self, song: NewSong) -> Result<Song, RepoError>;

  async fn get(&self, query: &SongQuery) -> Result<Vec<Song>, RepoError>;
  async fn get_all(&self) -> Result<Vec<Song>, RepoError>;

  /// Reservado para una búsqueda semántica futura.
  async fn get_using_ai(&self, prompt: &str) -> Result<Vec<Song>, RepoError>;
}
