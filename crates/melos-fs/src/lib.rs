pub mod io;
pub mod naming;

pub use io::{atomic_write_str, ensure_dir, is_within};
pub use naming::{FsError, ReservedFile, reserve_unique, sanitize_title, source_file_name};
