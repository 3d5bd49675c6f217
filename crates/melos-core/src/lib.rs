pub mod domain;
pub mod errors;
pub mod fingerprint;
pub mod ports;
pub mod query;
pub mod services;

#[cfg(test)]
mod testing;

pub use errors::CoreError;
pub use query::{NameFilter, QueryError, SongQuery, SongQueryInput, TagFilter, filter_songs};
