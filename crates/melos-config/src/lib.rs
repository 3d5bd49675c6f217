mod backend;
mod error;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use error::ConfigError;
pub use paths::{BASE_DIR_ENV, MelosPaths};

use once_cell::sync::Lazy;

// Rutas del proceso: portable (MELOS_BASE_DIR) o de sistema
pub static PATHS: Lazy<MelosPaths> = Lazy::new(|| MelosPaths::detect().expect("failed to init MelosPaths"));

// Backend de config sobre `melos.toml`
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.config_file()));
