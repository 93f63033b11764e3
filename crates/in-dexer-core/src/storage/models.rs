use crate::format::format_size;

/// A user-registered top-level directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRoot {
    pub id: i64,
    pub path: String,
}

/// One file observed during a walk. Column order mirrors the `files` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: i64,
    pub folder_id: i64,
    pub name: String,
    pub directory: String,
    pub size_bytes: Option<i64>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
}

impl FileRecord {
    /// Human-readable size; NULL renders like zero.
    pub fn size_display(&self) -> String {
        let bytes = self
            .size_bytes
            .and_then(|size| u64::try_from(size).ok())
            .unwrap_or(0);
        format_size(bytes)
    }
}

/// Row filter for `Database::query_files`.
#[derive(Debug, Clone, Copy)]
pub enum FileFilter<'a> {
    All,
    Root(i64),
    /// Files whose containing directory is exactly this path.
    Directory(&'a str),
    /// Files whose name or directory contains the term.
    NameOrDirectoryContains(&'a str),
}

/// Row filter for `Database::query_distinct_directories`.
#[derive(Debug, Clone, Copy)]
pub enum DirectoryFilter<'a> {
    All,
    Contains(&'a str),
}
