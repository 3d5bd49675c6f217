pub mod config;
pub mod error;
pub mod json_file;
pub mod memory;
pub mod models;
pub mod schema;
pub mod sqlite;

mod store;

pub use config::{StorageConfig, StoreBackend};
pub use error::StorageError;
pub use json_file::JsonFileDocumentStore;
pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;
pub use store::CatalogStore;
