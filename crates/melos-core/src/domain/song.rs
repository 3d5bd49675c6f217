use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ids::AudioHash;
use crate::domain::tag::Tag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("field `{0}` must not be empty")]
  EmptyField(&'static str),

  #[error("tag #{0} has an empty value")]
  EmptyTagValue(usize),

  #[error("patch does not change anything")]
  EmptyPatch,
}

/// La Canción (Song): metadatos de un audio ya reubicado en el área gestionada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
  /// Nombre de la canción.
  pub name: String,
  /// Autor / intérprete.
  pub author: String,
  /// Etiquetas; el orden no importa para las consultas y se admiten duplicados.
  #[serde(default)]
  pub tags: Vec<Tag>,
  /// Dónde vive el audio (ruta o URL dentro del almacenamiento gestionado).
  pub link_to_bucket: String,
  /// Huella asignada por el repositorio al crearla.
  pub audio_hash: AudioHash,
}

impl Song {
  pub fn from_new(new: NewSong, audio_hash: AudioHash) -> Self {
    Song { name: new.name, author: new.author, tags: new.tags, link_to_bucket: new.link_to_bucket, audio_hash }
  }
}

/// Input of `create_song`: a song without its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSong {
  pub name: String,
  pub author: String,
  #[serde(default)]
  pub tags: Vec<Tag>,
  pub link_to_bucket: String,
}

impl NewSong {
  pub fn from_metadata(metadata: SongMetadata, link_to_bucket: impl Into<String>) -> Self {
    NewSong { name: metadata.name, author: metadata.author, tags: metadata.tags, link_to_bucket: link_to_bucket.into() }
  }

  pub fn validate(&self) -> Result<(), ValidationError> {
    validate_descriptive(&self.name, &self.author, &self.tags)?;
    require("linkToBucket", &self.link_to_bucket)
  }
}

/// What a caller describes when the link is produced by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
  pub name: String,
  pub author: String,
  #[serde(default)]
  pub tags: Vec<Tag>,
}

impl SongMetadata {
  pub fn new(name: impl Into<String>, author: impl Into<String>, tags: Vec<Tag>) -> Self {
    Self { name: name.into(), author: author.into(), tags }
  }

  pub fn validate(&self) -> Result<(), ValidationError> {
    validate_descriptive(&self.name, &self.author, &self.tags)
  }
}

/// Los únicos campos mutables tras la creación.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongPatch {
  pub name: Option<String>,
  pub author: Option<String>,
}

impl SongPatch {
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.name.is_none() && self.author.is_none() {
      return Err(ValidationError::EmptyPatch);
    }
    if let Some(name) = &self.name {
      require("name", name)?;
    }
    if let Some(author) = &self.author {
      require("author", author)?;
    }
    Ok(())
  }

  /// `audio_hash` y `link_to_bucket` no se tocan nunca.
  pub fn apply(self, song: &mut Song) {
    if let Some(name) = self.name {
      song.name = name;
    }
    if let Some(author) = self.author {
      song.author = author;
    }
  }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() { Err(ValidationError::EmptyField(field)) } else { Ok(()) }
}

fn validate_descriptive(name: &str, author: &str, tags: &[Tag]) -> Result<(), ValidationError> {
  require("name", name)?;
  require("author", author)?;

  match tags.iter().position(|t| t.value.trim().is_empty()) {
    Some(idx) => Err(ValidationError::EmptyTagValue(idx)),
    None => Ok(()),
  }
}
