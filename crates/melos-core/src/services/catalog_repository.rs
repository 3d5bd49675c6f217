use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{NewSong, Song};
use crate::ports::{DocumentStore, Fingerprinter, RepoError, SongRepository};
use crate::query::SongQuery;

/// Repositorio de canciones sobre un `DocumentStore`.
///
/// No guarda nada entre llamadas: cada lectura pide un snapshot nuevo al almacén.
pub struct CatalogRepository<S, F>
where
  S: DocumentStore,
  F: Fingerprinter,
{
  store: Arc<S>,
  fingerprinter: F,
}

impl<S, F> CatalogRepository<S, F>
where
  S: DocumentStore,
  F: Fingerprinter,
{
  pub fn new(store: Arc<S>, fingerprinter: F) -> Self {
    Self { store, fingerprinter }
  }

  pub fn store(&self) -> &Arc<S> {
    &self.store
  }
}

#[async_trait]
impl<S, F> SongRepository for CatalogRepository<S, F>
where
  S: DocumentStore,
  F: Fingerprinter,
{
  async fn create_song(&self, song: NewSong) -> Result<Song, RepoError> {
    let audio_hash = self.fingerprinter.generate(&song).await;
    let record = Song::from_new(song, audio_hash);

    let appended = record.clone();
    self.store.transact(move |catalog| catalog.songs.push(appended)).await?;

    tracing::info!(audio_hash = %record.audio_hash, name = %record.name, "song created");
    Ok(record)
  }

  async fn get(&self, query: &SongQuery) -> Result<Vec<Song>, RepoError> {
    let mut songs = self.store.get_content().await?.songs;
    let total = songs.len();
    songs.retain(|song| query.matches(song));

    tracing::debug!(total, matched = songs.len(), "song query evaluated");
    Ok(songs)
  }

  async fn get_all(&self) -> Result<Vec<Song>, RepoError> {
    Ok(self.store.get_content().await?.songs)
  }

  async fn get_using_ai(&self, _prompt: &str) -> Result<Vec<Song>, RepoError> {
    Err(RepoError::NotImplemented("AI-based song retrieval"))
  }
}
