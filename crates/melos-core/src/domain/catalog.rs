use serde::{Deserialize, Serialize};

use crate::domain::song::Song;

/// The whole persisted collection, exactly as the document store keeps it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
  #[serde(default)]
  pub songs: Vec<Song>,
}

impl Catalog {
  pub fn new(songs: Vec<Song>) -> Self {
    Self { songs }
  }
}
