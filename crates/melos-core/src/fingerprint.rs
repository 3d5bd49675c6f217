//! `audioHash` generators.
//!
//! * [`TokenFingerprinter`]: `hash_<unix-millis>_<base36>`, unique per call, never looks at
//!   the audio. Two uploads of the same file get different hashes.
//! * [`ContentDigestFingerprinter`]: SHA-256 of the bytes behind `linkToBucket`, so equal
//!   audio yields equal hashes. Falls back to a token when the asset is not a readable
//!   local file.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::domain::{AudioHash, NewSong};
use crate::ports::Fingerprinter;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 8;
const CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenFingerprinter;

impl TokenFingerprinter {
  pub fn token(&self) -> AudioHash {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN).map(|_| BASE36[rng.random_range(0..BASE36.len())] as char).collect();

    AudioHash::new(format!("hash_{millis}_{suffix}"))
  }
}

#[async_trait]
impl Fingerprinter for TokenFingerprinter {
  async fn generate(&self, _song: &NewSong) -> AudioHash {
    self.token()
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDigestFingerprinter {
  fallback: TokenFingerprinter,
}

impl ContentDigestFingerprinter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Hex SHA-256 of a file, read in 1 MiB chunks.
  pub async fn digest_file(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
      let n = file.read(&mut buffer).await?;
      if n == 0 {
        break;
      }
      hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
  }
}

#[async_trait]
impl Fingerprinter for ContentDigestFingerprinter {
  async fn generate(&self, song: &NewSong) -> AudioHash {
    let path = Path::new(&song.link_to_bucket);

    match Self::digest_file(path).await {
      Ok(hex) => AudioHash::new(format!("sha256:{hex}")),
      Err(e) => {
        tracing::warn!(link = %song.link_to_bucket, error = %e, "asset not readable, using a unique token");
        self.fallback.token()
      }
    }
  }
}

/// Modo elegido en la sección `[fingerprint]` de la configuración.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintMode {
  #[default]
  Token,
  Content,
}

#[async_trait]
impl Fingerprinter for FingerprintMode {
  async fn generate(&self, song: &NewSong) -> AudioHash {
    match self {
      FingerprintMode::Token => TokenFingerprinter.generate(song).await,
      FingerprintMode::Content => ContentDigestFingerprinter::new().generate(song).await,
    }
  }
}
