use crate::error::ConfigError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// toml_edit para escribir sin perder los comentarios del usuario
use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  path: PathBuf,
}

impl TomlConfigBackend {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let content = match fs::read_to_string(&self.path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Ok(T::default());
      }
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;

    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(t)
  }

  /// Carga la sección (o su default) y la vuelve a escribir, así el fichero siempre
  /// muestra los valores efectivos.
  pub fn load_or_init<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Serialize + Default,
  {
    let cfg = self.load_section_with_default(section)?;
    self.save_section(section, &cfg)?;
    tracing::debug!(section, path = %self.path.display(), "config section loaded");
    Ok(cfg)
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let content = fs::read_to_string(&self.path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", self.path)))?;

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(t)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    // 1) Documento actual, o uno vacío si todavía no existe.
    let mut doc: DocumentMut = match fs::read_to_string(&self.path) {
      Ok(content) => {
        content.parse::<DocumentMut>().map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?
      }
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // 2) La sección serializada con `toml` (serde) queda como tabla sin cabecera.
    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    // 3) Reemplazar sólo esa sección; el resto del documento queda intacto.
    doc[section] = section_item;

    melos_fs::atomic_write_str(&self.path, &doc.to_string())?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::tempdir;

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Sample {
    #[serde(default = "default_level")]
    level: String,
    retries: u32,
  }

  fn default_level() -> String {
    "info".into()
  }

  impl Default for Sample {
    fn default() -> Self {
      Self { level: default_level(), retries: 3 }
    }
  }

  #[test]
  fn missing_file_yields_default_and_init_writes_it() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::new(tmp.path().join("melos.toml"));

    let loaded: Sample = backend.load_or_init("sample").unwrap();
    assert_eq!(loaded, Sample::default());

    let strict: Sample = backend.load_section("sample").unwrap();
    assert_eq!(strict, Sample::default());
  }

  #[test]
  fn save_section_keeps_other_sections_and_comments() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("melos.toml");
    fs::write(&path, "# hand written\n[other]\nkeep = true\n").unwrap();

    let backend = TomlConfigBackend::new(&path);
    backend.save_section("sample", &Sample { level: "debug".into(), retries: 7 }).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("# hand written"));
    assert!(content.contains("keep = true"));

    let loaded: Sample = backend.load_section("sample").unwrap();
    assert_eq!(loaded, Sample { level: "debug".into(), retries: 7 });
  }

  #[test]
  fn missing_section_is_an_error_for_strict_load() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("melos.toml");
    fs::write(&path, "[other]\nkeep = true\n").unwrap();

    let backend = TomlConfigBackend::new(&path);
    let err = backend.load_section::<Sample>("sample").unwrap_err();
    assert!(matches!(err, ConfigError::Other(_)));

    let fallback: Sample = backend.load_section_with_default("sample").unwrap();
    assert_eq!(fallback, Sample::default());
  }
}
