pub mod adapter;
pub mod config;
pub mod file;
pub mod url;

#[cfg(test)]
mod testing;

pub use adapter::{IngestSetupError, ManagedIngestor};
pub use config::IngestConfig;
pub use file::FileUploadStrategy;
pub use url::UrlUploadStrategy;
