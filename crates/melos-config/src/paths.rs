use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Variable que fuerza una instalación "portable" bajo un único directorio.
pub const BASE_DIR_ENV: &str = "MELOS_BASE_DIR";

/// Dónde vive cada cosa de melos en disco.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MelosPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl MelosPaths {
  /// Portable layout: `config/`, `data/` and `cache/` beneath `base`.
  pub fn under(base: impl Into<PathBuf>) -> Self {
    let base_dir = base.into();
    MelosPaths {
      config_dir: base_dir.join("config"),
      data_dir: base_dir.join("data"),
      cache_dir: base_dir.join("cache"),
      base_dir,
    }
  }

  /// Directorios estándar del sistema (XDG, AppData, Library...).
  pub fn system() -> Result<Self, ConfigError> {
    let dirs = ProjectDirs::from("com", "melos", "melos").ok_or(ConfigError::Directories)?;
    Ok(MelosPaths {
      base_dir: dirs.config_dir().to_path_buf(),
      config_dir: dirs.config_dir().to_path_buf(),
      data_dir: dirs.data_dir().to_path_buf(),
      cache_dir: dirs.cache_dir().to_path_buf(),
    })
  }

  /// `MELOS_BASE_DIR` si está definida, si no los directorios del sistema. Crea los tres.
  pub fn detect() -> Result<Self, ConfigError> {
    let paths = match std::env::var_os(BASE_DIR_ENV) {
      Some(base) if !base.is_empty() => Self::under(base),
      _ => Self::system()?,
    };
    paths.ensure()?;

    tracing::debug!(config = %paths.config_dir.display(), data = %paths.data_dir.display(), "paths resolved");
    Ok(paths)
  }

  pub fn ensure(&self) -> Result<(), ConfigError> {
    for dir in [&self.config_dir, &self.data_dir, &self.cache_dir] {
      std::fs::create_dir_all(dir)?;
    }
    Ok(())
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("melos.toml")
  }

  /// Área gestionada donde acaban los audios ingeridos.
  pub fn music_dir(&self) -> PathBuf {
    self.data_dir.join("downloads").join("music")
  }

  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }
}
