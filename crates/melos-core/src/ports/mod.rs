pub mod document_store;
pub mod fingerprint;
pub mod ingestion;
pub mod song_repository;

pub use document_store::{DocumentStore, StoreError};
pub use fingerprint::Fingerprinter;
pub use ingestion::{AudioIngestor, AudioSource, FileSource, IngestionError, UploadOutcome, UploadStrategy, UrlSource};
pub use song_repository::{RepoError, SongRepository};
