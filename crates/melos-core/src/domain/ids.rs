use serde::{Deserialize, Serialize};
use std::fmt;

/// Huella de una canción (`audioHash`). Es también su identidad dentro del catálogo.
///
/// Sólo el repositorio la asigna al crear la canción; el tipo de entrada `NewSong`
/// ni siquiera tiene el campo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioHash(String);

impl AudioHash {
  pub fn new(value: impl Into<String>) -> Self {
    AudioHash(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<String> for AudioHash {
  fn from(s: String) -> Self {
    AudioHash(s)
  }
}

impl From<AudioHash> for String {
  fn from(hash: AudioHash) -> Self {
    hash.0
  }
}

impl fmt::Display for AudioHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
