use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Reemplaza `path` de forma atómica: escribe a un temporal único en el mismo directorio,
/// `fsync` y `rename`.
///
/// Un lector concurrente ve el contenido anterior o el nuevo, nunca uno a medias, y dos
/// escritores simultáneos (incluso de procesos distintos) no comparten temporal: gana el
/// último `rename`.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
    Some(parent) => {
      fs::create_dir_all(parent)?;
      parent
    }
    None => Path::new("."),
  };

  let mut tmp = NamedTempFile::new_in(parent)?;
  tmp.write_all(contents.as_bytes())?;
  tmp.as_file().sync_all()?;

  // Si falla, `NamedTempFile` borra el temporal al soltarse.
  tmp.persist(path).map_err(|e| e.error)?;
  Ok(())
}

/// Creates `dir` (and its parents) if absent. Returns `true` when something was created.
pub async fn ensure_dir(dir: &Path) -> io::Result<bool> {
  if tokio::fs::try_exists(dir).await? {
    return Ok(false);
  }

  tokio::fs::create_dir_all(dir).await?;
  tracing::debug!(dir = %dir.display(), "created directory");
  Ok(true)
}

/// Checks whether `path` resolves to a location beneath `root`.
///
/// Both sides are canonicalized, so the answer is `false` for anything that does not exist.
pub fn is_within(root: &Path, path: &Path) -> bool {
  match (root.canonicalize(), path.canonicalize()) {
    (Ok(root), Ok(path)) => path != root && path.starts_with(root),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn atomic_write_replaces_content_and_leaves_no_tmp() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join("catalog.json");

    atomic_write_str(&path, "first").unwrap();
    atomic_write_str(&path, "second").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
  }

  #[test]
  fn concurrent_writers_of_one_file_all_succeed() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("melos.toml");

    for round in 0..20 {
      let handles: Vec<_> = (0..4)
        .map(|writer| {
          let path = path.clone();
          std::thread::spawn(move || atomic_write_str(&path, &format!("round = {round}\nwriter = {writer}\n")))
        })
        .collect();

      for h in handles {
        h.join().unwrap().unwrap();
      }

      let content = fs::read_to_string(&path).unwrap();
      assert!(content.starts_with(&format!("round = {round}\n")), "{content}");
    }

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
  }

  #[tokio::test]
  async fn ensure_dir_reports_creation_once() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("downloads").join("music");

    assert!(ensure_dir(&dir).await.unwrap());
    assert!(!ensure_dir(&dir).await.unwrap());
    assert!(dir.is_dir());
  }

  #[test]
  fn is_within_rejects_outside_and_root_itself() {
    let tmp = tempdir().unwrap();
    let inside = tmp.path().join("a.mp3");
    fs::write(&inside, b"x").unwrap();
    let other = tempdir().unwrap();
    let outside = other.path().join("b.mp3");
    fs::write(&outside, b"y").unwrap();

    assert!(is_within(tmp.path(), &inside));
    assert!(!is_within(tmp.path(), &outside));
    assert!(!is_within(tmp.path(), tmp.path()));
    assert!(!is_within(tmp.path(), &tmp.path().join("missing.mp3")));
  }
}
