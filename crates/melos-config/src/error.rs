use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid melos.toml: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("no home directory to place melos data in")]
  Directories,

  #[error("{0}")]
  Other(String),
}
