use std::sync::Arc;

use crate::domain::{AudioHash, NewSong, Song, SongMetadata, SongPatch};
use crate::errors::CoreError;
use crate::ports::{AudioIngestor, AudioSource, DocumentStore, FileSource, SongRepository, UrlSource};
use crate::query::SongQuery;

/// Capa de servicio: une ingestión, repositorio y almacén.
///
/// - `import_*`: sube el audio al área gestionada y registra la canción.
/// - `update_song` / `delete_song`: operan directamente sobre el almacén por identidad.
/// - lecturas: delegan en el repositorio.
pub struct CatalogService<R, S, I>
where
  R: SongRepository,
  S: DocumentStore,
  I: AudioIngestor,
{
  repo: R,
  store: Arc<S>,
  ingestor: I,
}

impl<R, S, I> CatalogService<R, S, I>
where
  R: SongRepository,
  S: DocumentStore,
  I: AudioIngestor,
{
  pub fn new(repo: R, store: Arc<S>, ingestor: I) -> Self {
    Self { repo, store, ingestor }
  }

  // -------- COMMANDS (write) --------

  pub async fn import_from_url(&self, source: UrlSource, metadata: SongMetadata) -> Result<Song, CoreError> {
    self.import(AudioSource::Url(source), metadata).await
  }

  pub async fn import_from_file(&self, source: FileSource, metadata: SongMetadata) -> Result<Song, CoreError> {
    self.import(AudioSource::File(source), metadata).await
  }

  /// Registra una canción cuyo audio ya vive en el área gestionada.
  pub async fn register_link(&self, song: NewSong) -> Result<Song, CoreError> {
    song.validate()?;
    Ok(self.repo.create_song(song).await?)
  }

  pub async fn update_song(&self, audio_hash: &AudioHash, patch: SongPatch) -> Result<Song, CoreError> {
    patch.validate()?;

    let target = audio_hash.clone();
    let updated = self
      .store
      .transact(move |catalog| {
        let idx = locate(&catalog.songs, &target)?;
        let song = &mut catalog.songs[idx];
        patch.apply(song);
        Ok::<_, CoreError>(song.clone())
      })
      .await??;

    tracing::info!(%audio_hash, "song updated");
    Ok(updated)
  }

  /// Quita la canción del catálogo y después su audio del área gestionada.
  ///
  /// Si el audio no se puede borrar, la canción ya no existe igualmente: sólo se avisa.
  pub async fn delete_song(&self, audio_hash: &AudioHash) -> Result<Song, CoreError> {
    let target = audio_hash.clone();
    let removed = self
      .store
      .transact(move |catalog| {
        let idx = locate(&catalog.songs, &target)?;
        Ok::<_, CoreError>(catalog.songs.remove(idx))
      })
      .await??;

    match self.ingestor.discard(&removed.link_to_bucket).await {
      Ok(true) => tracing::debug!(link = %removed.link_to_bucket, "asset removed"),
      Ok(false) => tracing::debug!(link = %removed.link_to_bucket, "asset outside managed storage, kept"),
      Err(e) => tracing::warn!(link = %removed.link_to_bucket, error = %e, "could not remove asset"),
    }

    tracing::info!(%audio_hash, "song deleted");
    Ok(removed)
  }

  // -------- QUERY (read) --------

  pub async fn get_song(&self, audio_hash: &AudioHash) -> Result<Song, CoreError> {
    let mut songs = self.repo.get_all().await?;
    let idx = locate(&songs, audio_hash)?;
    Ok(songs.swap_remove(idx))
  }

  pub async fn find(&self, query: &SongQuery) -> Result<Vec<Song>, CoreError> {
    Ok(self.repo.get(query).await?)
  }

  pub async fn list(&self) -> Result<Vec<Song>, CoreError> {
    Ok(self.repo.get_all().await?)
  }

  pub async fn ask(&self, prompt: &str) -> Result<Vec<Song>, CoreError> {
    Ok(self.repo.get_using_ai(prompt).await?)
  }

  async fn import(&self, source: AudioSource, metadata: SongMetadata) -> Result<Song, CoreError> {
    // 1) Validar antes de tocar disco o red.
    metadata.validate()?;

    // 2) Reubicar el audio.
    let outcome = self.ingestor.upload(source).await?;
    tracing::info!(
      reference = %outcome.storage_reference,
      format = outcome.format.as_deref().unwrap_or("unknown"),
      "audio ingested"
    );

    // 3) Registrar; si falla, no dejamos el audio huérfano.
    let new_song = NewSong::from_metadata(metadata, outcome.storage_reference.clone());
    match self.repo.create_song(new_song).await {
      Ok(song) => Ok(song),
      Err(e) => {
        if let Err(discard_err) = self.ingestor.discard(&outcome.storage_reference).await {
          tracing::warn!(reference = %outcome.storage_reference, error = %discard_err, "rollback of upload failed");
        }
        Err(e.into())
      }
    }
  }
}

/// Posición de la única canción con ese hash.
///
/// En modo `content` dos audios idénticos comparten hash; ahí no se elige ninguno.
fn locate(songs: &[Song], audio_hash: &AudioHash) -> Result<usize, CoreError> {
  let mut positions = songs.iter().enumerate().filter(|(_, s)| &s.audio_hash == audio_hash).map(|(idx, _)| idx);

  match (positions.next(), positions.count()) {
    (None, _) => Err(CoreError::NotFound),
    (Some(idx), 0) => Ok(idx),
    (Some(_), rest) => Err(CoreError::AmbiguousIdentity { audio_hash: audio_hash.clone(), count: rest + 1 }),
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;
  use std::sync::atomic::Ordering;

  use super::*;
  use crate::domain::{Tag, ValidationError};
  use crate::fingerprint::{ContentDigestFingerprinter, TokenFingerprinter};
  use crate::ports::IngestionError;
  use crate::services::CatalogRepository;
  use crate::testing::{FakeIngestor, FakeStore, fixture_songs};

  type TestService = CatalogService<CatalogRepository<FakeStore, TokenFingerprinter>, FakeStore, FakeIngestor>;

  fn service_with(songs: Vec<Song>) -> (Arc<FakeStore>, TestService) {
    let store = Arc::new(FakeStore::with_songs(songs));
    let repo = CatalogRepository::new(Arc::clone(&store), TokenFingerprinter);
    (Arc::clone(&store), CatalogService::new(repo, store, FakeIngestor::default()))
  }

  fn metadata() -> SongMetadata {
    SongMetadata::new("Night Drive", "Artist D", vec![Tag::new("mood", "calm")])
  }

  fn url_source() -> UrlSource {
    UrlSource { url: "https://cdn.example.com/night.mp4".into(), title: "Night Drive".into() }
  }

  #[tokio::test]
  async fn import_from_url_registers_the_managed_reference() {
    let (store, service) = service_with(vec![]);

    let song = service.import_from_url(url_source(), metadata()).await.unwrap();

    assert_eq!(song.link_to_bucket, "/managed/1-0000-Night Drive.mp4");
    assert!(!song.audio_hash.is_empty());
    assert_eq!(store.songs(), vec![song]);
  }

  #[tokio::test]
  async fn import_from_file_uses_the_file_strategy() {
    let (_store, service) = service_with(vec![]);
    let source = FileSource { file_path: PathBuf::from("/tmp/in.flac"), file_name: "in.flac".into() };

    let song = service.import_from_file(source.clone(), metadata()).await.unwrap();

    assert_eq!(song.link_to_bucket, "/managed/1-0000-in.flac");
    assert_eq!(*service.ingestor.uploads.lock().unwrap(), vec![AudioSource::File(source)]);
  }

  #[tokio::test]
  async fn failed_ingestion_persists_nothing() {
    let (store, service) = service_with(vec![]);
    service.ingestor.fail.store(true, Ordering::SeqCst);

    let err = service.import_from_url(url_source(), metadata()).await.unwrap_err();

    assert!(matches!(err, CoreError::Ingestion(IngestionError::FetchFailed { .. })));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert!(store.songs().is_empty());
  }

  #[tokio::test]
  async fn invalid_metadata_never_reaches_ingestion() {
    let (_store, service) = service_with(vec![]);
    let bad = SongMetadata::new("", "Artist D", vec![]);

    let err = service.import_from_url(url_source(), bad).await.unwrap_err();

    assert!(matches!(err, CoreError::Validation(ValidationError::EmptyField("name"))));
    assert!(service.ingestor.uploads.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn failed_registration_discards_the_upload() {
    let (store, service) = service_with(vec![]);
    store.fail_writes.store(true, Ordering::SeqCst);

    let err = service.import_from_url(url_source(), metadata()).await.unwrap_err();

    assert!(matches!(err, CoreError::Storage(_)));
    assert_eq!(*service.ingestor.discarded.lock().unwrap(), vec!["/managed/1-0000-Night Drive.mp4".to_string()]);
  }

  #[tokio::test]
  async fn register_link_validates_first() {
    let (store, service) = service_with(vec![]);
    let song = NewSong::from_metadata(metadata(), "");

    let err = service.register_link(song).await.unwrap_err();

    assert!(matches!(err, CoreError::Validation(ValidationError::EmptyField("linkToBucket"))));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn update_changes_only_mutable_fields() {
    let (store, service) = service_with(fixture_songs());
    let hash = AudioHash::new("hash_2");
    let patch = SongPatch { name: Some("Song Two (Live)".into()), author: Some("Artist B & Friends".into()) };

    let updated = service.update_song(&hash, patch).await.unwrap();

    assert_eq!(updated.name, "Song Two (Live)");
    assert_eq!(updated.author, "Artist B & Friends");
    assert_eq!(updated.audio_hash, hash);
    assert_eq!(updated.link_to_bucket, "/music/hash_2.mp3");
    assert_eq!(store.songs()[1], updated);
  }

  #[tokio::test]
  async fn update_and_delete_report_unknown_hashes() {
    let (_store, service) = service_with(fixture_songs());
    let missing = AudioHash::new("hash_404");
    let patch = SongPatch { name: Some("x".into()), author: None };

    assert!(matches!(service.update_song(&missing, patch).await, Err(CoreError::NotFound)));
    assert!(matches!(service.delete_song(&missing).await, Err(CoreError::NotFound)));
    assert!(service.ingestor.discarded.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn delete_removes_record_then_asset() {
    let (store, service) = service_with(fixture_songs());

    let removed = service.delete_song(&AudioHash::new("hash_3")).await.unwrap();

    assert_eq!(removed.name, "Another Song");
    assert_eq!(store.songs().len(), 3);
    assert!(store.songs().iter().all(|s| s.audio_hash.as_str() != "hash_3"));
    assert_eq!(*service.ingestor.discarded.lock().unwrap(), vec!["/music/hash_3.mp3".to_string()]);
  }

  #[tokio::test]
  async fn reads_delegate_to_the_repository() {
    let (_store, service) = service_with(fixture_songs());

    assert_eq!(service.list().await.unwrap().len(), 4);
    assert_eq!(service.find(&SongQuery::new().author("Artist A")).await.unwrap().len(), 2);
    assert!(matches!(service.ask("anything calm").await, Err(CoreError::NotImplemented(_))));
  }

  #[tokio::test]
  async fn get_song_looks_up_by_hash() {
    let (store, service) = service_with(fixture_songs());

    let song = service.get_song(&AudioHash::new("hash_3")).await.unwrap();
    assert_eq!(song.name, "Another Song");
    assert!(matches!(service.get_song(&AudioHash::new("hash_404")).await, Err(CoreError::NotFound)));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn identical_audio_makes_hash_ambiguous_for_update_and_delete() {
    let tmp = tempfile::tempdir().unwrap();
    let first = tmp.path().join("first.mp3");
    let second = tmp.path().join("second.mp3");
    std::fs::write(&first, b"same audio").unwrap();
    std::fs::write(&second, b"same audio").unwrap();

    let store = Arc::new(FakeStore::default());
    let repo = CatalogRepository::new(Arc::clone(&store), ContentDigestFingerprinter::new());
    let service = CatalogService::new(repo, Arc::clone(&store), FakeIngestor::default());

    let a = service.register_link(NewSong::from_metadata(metadata(), first.to_str().unwrap())).await.unwrap();
    let b = service
      .register_link(NewSong::from_metadata(SongMetadata::new("Second", "Artist D", vec![]), second.to_str().unwrap()))
      .await
      .unwrap();
    assert_eq!(a.audio_hash, b.audio_hash);

    let patch = SongPatch { name: Some("Renamed Second".into()), author: None };
    let err = service.update_song(&b.audio_hash, patch).await.unwrap_err();
    assert!(matches!(err, CoreError::AmbiguousIdentity { count: 2, .. }));

    assert!(matches!(service.delete_song(&b.audio_hash).await, Err(CoreError::AmbiguousIdentity { .. })));
    assert!(matches!(service.get_song(&b.audio_hash).await, Err(CoreError::AmbiguousIdentity { .. })));

    assert_eq!(store.songs(), vec![a, b]);
    assert!(service.ingestor.discarded.lock().unwrap().is_empty());
  }
}
