use async_trait::async_trait;

use crate::domain::{AudioHash, NewSong};

/// Port que produce el `audioHash` de una canción en el momento de crearla.
///
/// No puede fallar: una implementación que no logre leer el contenido debe caer a un
/// identificador único.
#[async_trait]
pub trait Fingerprinter: Send + Sync {
  async fn generate(&self, song: &NewSong) -> AudioHash;
}
