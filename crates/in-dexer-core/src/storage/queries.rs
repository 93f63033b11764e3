use super::models::*;
use super::sqlite::Database;
use crate::platform::normalize_path;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Result, Row};
use std::collections::BTreeSet;
use tracing::debug;

const FILE_COLUMNS: &str =
    "id, folder_id, name, directory, size_bytes, creation_date, modification_date";

impl Database {
    // ── Indexed Roots ────────────────────────────────────────────

    /// Register a root. A path that is already present (after normalization)
    /// is left as is; the existing id is returned.
    pub fn add_root(&self, path: &str) -> Result<i64> {
        let path = normalize_path(path);
        let inserted = self.connection().execute(
            "INSERT OR IGNORE INTO indexed_folders (path) VALUES (?1)",
            params![path],
        )?;
        let id = self.connection().query_row(
            "SELECT id FROM indexed_folders WHERE path = ?1",
            params![path],
            |row| row.get(0),
        )?;
        if inserted > 0 {
            debug!("Registered root {} as {}", path, id);
        }
        Ok(id)
    }

    pub fn root_id(&self, path: &str) -> Result<Option<i64>> {
        match self.connection().query_row(
            "SELECT id FROM indexed_folders WHERE path = ?1",
            params![normalize_path(path)],
            |row| row.get(0),
        ) {
            Ok(id) => Ok(Some(id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a root; its files go with it through the cascading foreign key.
    /// Returns false when nothing matched, which is not an error.
    pub fn remove_root(&self, path: &str) -> Result<bool> {
        let path = normalize_path(path);
        let deleted = self.connection().execute(
            "DELETE FROM indexed_folders WHERE path = ?1",
            params![path],
        )?;
        debug!("Removed root {} ({} rows)", path, deleted);
        Ok(deleted > 0)
    }

    pub fn list_roots(&self) -> Result<Vec<IndexedRoot>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT id, path FROM indexed_folders ORDER BY path")?;
        let roots = stmt
            .query_map([], |row| {
                Ok(IndexedRoot {
                    id: row.get(0)?,
                    path: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(roots)
    }

    // ── Files ────────────────────────────────────────────────────

    /// Delete every file row owned by `root_id` and insert `records` in their
    /// place, in one transaction. `folder_id` on the records is ignored.
    pub fn replace_files(&self, root_id: i64, records: &[FileRecord]) -> Result<usize> {
        let tx = self.connection().unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM files WHERE folder_id = ?1", params![root_id])?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO files \
                 (folder_id, name, directory, size_bytes, creation_date, modification_date) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                count += stmt.execute(params![
                    root_id,
                    record.name,
                    record.directory,
                    record.size_bytes,
                    record.creation_date,
                    record.modification_date,
                ])?;
            }
        }
        tx.commit()?;
        debug!(
            "Replaced files for root {}: {} removed, {} inserted",
            root_id, removed, count
        );
        Ok(count)
    }

    pub fn query_files(&self, filter: FileFilter<'_>) -> Result<Vec<FileRecord>> {
        let (clause, param) = file_filter_clause(filter);
        let mut stmt = self.connection().prepare(&format!(
            "SELECT {} FROM files{} ORDER BY directory, name, id",
            FILE_COLUMNS, clause
        ))?;
        let files = stmt
            .query_map(params_from_iter(param), file_record_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(files)
    }

    pub fn count_files(&self, filter: FileFilter<'_>) -> Result<i64> {
        let (clause, param) = file_filter_clause(filter);
        self.connection().query_row(
            &format!("SELECT COUNT(*) FROM files{}", clause),
            params_from_iter(param),
            |row| row.get(0),
        )
    }

    // ── Directories ──────────────────────────────────────────────

    pub fn list_distinct_directories(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .query_distinct_directories(DirectoryFilter::All)?
            .into_iter()
            .collect())
    }

    pub fn query_distinct_directories(&self, filter: DirectoryFilter<'_>) -> Result<Vec<String>> {
        let (clause, param) = match filter {
            DirectoryFilter::All => ("", None),
            DirectoryFilter::Contains(term) => (
                " WHERE directory LIKE ?1 ESCAPE '\\'",
                Some(Value::Text(like_pattern(term))),
            ),
        };
        let mut stmt = self.connection().prepare(&format!(
            "SELECT DISTINCT directory FROM files{} ORDER BY directory",
            clause
        ))?;
        let dirs = stmt
            .query_map(params_from_iter(param), |row| row.get(0))?
            .collect::<Result<Vec<String>>>()?;
        Ok(dirs)
    }
}

fn file_filter_clause(filter: FileFilter<'_>) -> (&'static str, Option<Value>) {
    match filter {
        FileFilter::All => ("", None),
        FileFilter::Root(root_id) => (" WHERE folder_id = ?1", Some(Value::Integer(root_id))),
        FileFilter::Directory(path) => (
            " WHERE directory = ?1",
            Some(Value::Text(normalize_path(path))),
        ),
        FileFilter::NameOrDirectoryContains(term) => (
            " WHERE name LIKE ?1 ESCAPE '\\' OR directory LIKE ?1 ESCAPE '\\'",
            Some(Value::Text(like_pattern(term))),
        ),
    }
}

fn file_record_from_row(row: &Row<'_>) -> Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        folder_id: row.get(1)?,
        name: row.get(2)?,
        directory: row.get(3)?,
        size_bytes: row.get(4)?,
        creation_date: row.get(5)?,
        modification_date: row.get(6)?,
    })
}

/// `%term%` with LIKE wildcards escaped, so the term matches literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
