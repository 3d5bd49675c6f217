//! Dobles de prueba compartidos por los tests del crate.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{AudioHash, Catalog, Song, Tag};
use crate::ports::{AudioIngestor, AudioSource, DocumentStore, IngestionError, StoreError, UploadOutcome};

fn song(name: &str, author: &str, tags: &[(&str, &str)], hash: &str) -> Song {
  Song {
    name: name.into(),
    author: author.into(),
    tags: tags.iter().map(|(k, v)| Tag::new(*k, *v)).collect(),
    link_to_bucket: format!("/music/{hash}.mp3"),
    audio_hash: AudioHash::new(hash),
  }
}

pub fn fixture_songs() -> Vec<Song> {
  vec![
    song("Song One", "Artist A", &[("genre", "rock"), ("mood", "energetic")], "hash_1"),
    song("Song Two", "Artist B", &[("genre", "pop"), ("mood", "calm")], "hash_2"),
    song("Another Song", "Artist A", &[("genre", "rock"), ("mood", "calm")], "hash_3"),
    song("Test Song", "Artist C", &[("genre", "jazz")], "hash_4"),
  ]
}

/// In-memory store that counts calls and can be told to fail writes.
#[derive(Default)]
pub struct FakeStore {
  pub catalog: Mutex<Catalog>,
  pub reads: AtomicUsize,
  pub writes: AtomicUsize,
  pub fail_writes: AtomicBool,
}

impl FakeStore {
  pub fn with_songs(songs: Vec<Song>) -> Self {
    Self { catalog: Mutex::new(Catalog::new(songs)), ..Default::default() }
  }

  pub fn songs(&self) -> Vec<Song> {
    self.catalog.lock().unwrap().songs.clone()
  }
}

#[async_trait]
impl DocumentStore for FakeStore {
  async fn transact<F, T>(&self, mutation: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut Catalog) -> T + Send + 'static,
    T: Send + 'static,
  {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(StoreError::Write("disk full".into()));
    }
    self.writes.fetch_add(1, Ordering::SeqCst);
    let mut guard = self.catalog.lock().unwrap();
    Ok(mutation(&mut guard))
  }

  async fn get_content(&self) -> Result<Catalog, StoreError> {
    self.reads.fetch_add(1, Ordering::SeqCst);
    Ok(self.catalog.lock().unwrap().clone())
  }
}

/// Ingestor that records what it was asked to do.
#[derive(Default)]
pub struct FakeIngestor {
  pub fail: AtomicBool,
  pub uploads: Mutex<Vec<AudioSource>>,
  pub discarded: Mutex<Vec<String>>,
}

#[async_trait]
impl AudioIngestor for FakeIngestor {
  async fn upload(&self, source: AudioSource) -> Result<UploadOutcome, IngestionError> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(match source {
        AudioSource::Url(src) => IngestionError::FetchFailed { url: src.url, reason: "404 Not Found".into() },
        AudioSource::File(src) => IngestionError::SourceNotFound(src.file_path),
      });
    }

    let reference = match &source {
      AudioSource::Url(src) => format!("/managed/1-0000-{}.mp4", src.title),
      AudioSource::File(src) => format!("/managed/1-0000-{}", src.file_name),
    };
    self.uploads.lock().unwrap().push(source);

    Ok(UploadOutcome { storage_reference: reference, format: Some("mp4".into()), duration: None })
  }

  async fn discard(&self, storage_reference: &str) -> Result<bool, IngestionError> {
    self.discarded.lock().unwrap().push(storage_reference.to_string());
    Ok(storage_reference.starts_with("/managed/"))
  }
}
