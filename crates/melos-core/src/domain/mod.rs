pub mod catalog;
pub mod ids;
pub mod song;
pub mod tag;

pub use catalog::Catalog;
pub use ids::AudioHash;
pub use song::{NewSong, Song, SongMetadata, SongPatch, ValidationError};
pub use tag::Tag;
