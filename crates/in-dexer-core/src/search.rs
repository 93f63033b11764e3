use crate::platform::basename;
use crate::storage::{Database, DirectoryFilter, FileFilter, FileRecord};
use rusqlite::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Files,
    Folders,
}

/// A file row as shown in a results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHit {
    pub name: String,
    /// Already formatted, e.g. `2.00 KB`.
    pub size: String,
    pub directory: String,
    pub modification_date: Option<String>,
    pub creation_date: Option<String>,
}

impl From<FileRecord> for FileHit {
    fn from(record: FileRecord) -> Self {
        FileHit {
            size: record.size_display(),
            name: record.name,
            directory: record.directory,
            modification_date: record.modification_date,
            creation_date: record.creation_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderHit {
    /// Basename, or the full path when the basename is empty.
    pub name: String,
    pub path: String,
}

impl FolderHit {
    pub fn from_path(path: String) -> Self {
        let name = match basename(&path) {
            "" => path.clone(),
            base => base.to_string(),
        };
        FolderHit { name, path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    Files(Vec<FileHit>),
    Folders(Vec<FolderHit>),
}

impl SearchResults {
    pub fn empty(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Files => SearchResults::Files(Vec::new()),
            SearchMode::Folders => SearchResults::Folders(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SearchResults::Files(hits) => hits.len(),
            SearchResults::Folders(hits) => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Directory to reveal in the hierarchy for the hit at `row`.
    pub fn reveal_path(&self, row: usize) -> Option<&str> {
        match self {
            SearchResults::Files(hits) => hits.get(row).map(|h| h.directory.as_str()),
            SearchResults::Folders(hits) => hits.get(row).map(|h| h.path.as_str()),
        }
    }
}

/// Substring search over stored rows. An empty term matches nothing.
///
/// Matching is SQLite `LIKE`: case-insensitive for ASCII letters only.
pub fn search(db: &Database, term: &str, mode: SearchMode) -> Result<SearchResults> {
    if term.is_empty() {
        return Ok(SearchResults::empty(mode));
    }

    match mode {
        SearchMode::Files => {
            let hits = db
                .query_files(FileFilter::NameOrDirectoryContains(term))?
                .into_iter()
                .map(FileHit::from)
                .collect();
            Ok(SearchResults::Files(hits))
        }
        SearchMode::Folders => {
            let hits = db
                .query_distinct_directories(DirectoryFilter::Contains(term))?
                .into_iter()
                .map(FolderHit::from_path)
                .collect();
            Ok(SearchResults::Folders(hits))
        }
    }
}
