use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tokio::fs::{File, OpenOptions};

#[derive(Debug, Error)]
pub enum FsError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid file name: {0:?}")]
  InvalidName(String),

  #[error("could not reserve a unique name in {0}")]
  Exhausted(PathBuf),
}

/// Contador de proceso: dos reservas en el mismo milisegundo no comparten prefijo.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Intentos máximos antes de rendirse (colisiones con otros procesos).
const MAX_ATTEMPTS: u32 = 64;

/// A destination file created with create-new semantics. Nobody else can have it.
#[derive(Debug)]
pub struct ReservedFile {
  pub path: PathBuf,
  pub file: File,
}

fn unix_millis() -> u128 {
  SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Replaces every whitespace run with `_` and path separators with `-`.
///
/// `"My  Song\tLive"` → `"My_Song_Live"`. An empty result becomes `"untitled"`.
pub fn sanitize_title(title: &str) -> String {
  let mut out = String::with_capacity(title.len());
  let mut in_space = false;

  for c in title.chars() {
    if c.is_whitespace() {
      if !in_space {
        out.push('_');
      }
      in_space = true;
      continue;
    }

    in_space = false;
    match c {
      '/' | '\\' => out.push('-'),
      _ => out.push(c),
    }
  }

  if out.is_empty() || out == "." || out == ".." { "untitled".to_string() } else { out }
}

/// Keeps only the final component of a caller supplied file name.
pub fn source_file_name(file_name: &str) -> Result<String, FsError> {
  let name = Path::new(file_name)
    .file_name()
    .and_then(|n| n.to_str())
    .map(str::trim)
    .filter(|n| !n.is_empty())
    .ok_or_else(|| FsError::InvalidName(file_name.to_string()))?;

  Ok(name.to_string())
}

/// Crea `<millis>-<seq>-<suffix>` dentro de `dir` sin pisar nada existente.
///
/// The timestamp keeps names sortable, the sequence widens it for calls within the same
/// millisecond and `create_new` settles races with other processes.
pub async fn reserve_unique(dir: &Path, suffix: &str) -> Result<ReservedFile, FsError> {
  for _ in 0..MAX_ATTEMPTS {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let path = dir.join(format!("{}-{:04}-{}", unix_millis(), seq % 10_000, suffix));

    match OpenOptions::new().write(true).create_new(true).open(&path).await {
      Ok(file) => return Ok(ReservedFile { path, file }),
      Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
      Err(e) => return Err(e.into()),
    }
  }

  Err(FsError::Exhausted(dir.to_path_buf()))
}
