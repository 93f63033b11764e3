pub mod models;
mod queries;
mod sqlite;

pub use models::{DirectoryFilter, FileFilter, FileRecord, IndexedRoot};
pub use sqlite::Database;
