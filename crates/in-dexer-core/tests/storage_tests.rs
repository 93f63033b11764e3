use in_dexer_core::platform::normalize_path;
use in_dexer_core::storage::{Database, DirectoryFilter, FileFilter, FileRecord};

fn make_test_file_record(root_id: i64, directory: &str, name: &str, size: i64) -> FileRecord {
    FileRecord {
        id: 0,
        folder_id: root_id,
        name: name.to_string(),
        directory: normalize_path(directory),
        size_bytes: Some(size),
        creation_date: Some("2024-03-01 10:00:00".to_string()),
        modification_date: Some("2024-03-02 11:30:00".to_string()),
    }
}

fn setup_db_with_files(root: &str, files: &[(&str, &str, i64)]) -> (Database, i64) {
    let db = Database::open_in_memory().unwrap();
    let root_id = db.add_root(root).unwrap();
    let records: Vec<FileRecord> = files
        .iter()
        .map(|(dir, name, size)| make_test_file_record(root_id, dir, name, *size))
        .collect();
    db.replace_files(root_id, &records).unwrap();
    (db, root_id)
}

#[test]
fn test_ensure_schema_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    db.ensure_schema().unwrap();
    db.ensure_schema().unwrap();

    let tables: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('indexed_folders', 'files')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 2);
}

#[test]
fn test_files_column_order() {
    let db = Database::open_in_memory().unwrap();
    let stmt = db.connection().prepare("SELECT * FROM files").unwrap();
    let columns: Vec<&str> = stmt.column_names();
    assert_eq!(
        columns,
        vec![
            "id",
            "folder_id",
            "name",
            "directory",
            "size_bytes",
            "creation_date",
            "modification_date"
        ]
    );
}

#[test]
fn test_schema_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("index.db");
    {
        let db = Database::open(&db_path).unwrap();
        db.add_root("/data").unwrap();
    }
    let db = Database::open(&db_path).unwrap();
    assert_eq!(db.list_roots().unwrap().len(), 1);
}

#[test]
fn test_add_root_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let first = db.add_root("/data/photos").unwrap();
    let second = db.add_root("/data//photos/").unwrap();
    let third = db.add_root("/data/photos/./").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, third);

    let roots = db.list_roots().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].path, normalize_path("/data/photos"));
}

#[test]
fn test_root_id_lookup() {
    let db = Database::open_in_memory().unwrap();
    let id = db.add_root("/data").unwrap();
    assert_eq!(db.root_id("/data/").unwrap(), Some(id));
    assert_eq!(db.root_id("/elsewhere").unwrap(), None);
}

#[test]
fn test_remove_root_cascades_to_files() {
    let (db, root_id) = setup_db_with_files(
        "/data",
        &[("/data", "a.txt", 10), ("/data/sub", "b.txt", 20)],
    );
    let other_id = db.add_root("/other").unwrap();
    db.replace_files(other_id, &[make_test_file_record(other_id, "/other", "c.txt", 30)])
        .unwrap();

    assert!(db.remove_root("/data").unwrap());

    assert_eq!(db.count_files(FileFilter::Root(root_id)).unwrap(), 0);
    assert_eq!(db.count_files(FileFilter::All).unwrap(), 1);

    let orphans: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM files WHERE folder_id NOT IN (SELECT id FROM indexed_folders)",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn test_remove_absent_root_is_noop() {
    let db = Database::open_in_memory().unwrap();
    db.add_root("/data").unwrap();
    assert!(!db.remove_root("/not/registered").unwrap());
    assert_eq!(db.list_roots().unwrap().len(), 1);
}

#[test]
fn test_replace_files_replaces_only_that_root() {
    let (db, root_id) = setup_db_with_files(
        "/data",
        &[("/data", "old1.txt", 1), ("/data", "old2.txt", 2)],
    );
    let other_id = db.add_root("/other").unwrap();
    db.replace_files(other_id, &[make_test_file_record(other_id, "/other", "keep.txt", 3)])
        .unwrap();

    let inserted = db
        .replace_files(root_id, &[make_test_file_record(root_id, "/data", "new.txt", 4)])
        .unwrap();
    assert_eq!(inserted, 1);

    let names: Vec<String> = db
        .query_files(FileFilter::Root(root_id))
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["new.txt".to_string()]);
    assert_eq!(db.count_files(FileFilter::Root(other_id)).unwrap(), 1);
}

#[test]
fn test_replace_files_with_empty_set_clears_root() {
    let (db, root_id) = setup_db_with_files("/data", &[("/data", "a.txt", 1)]);
    assert_eq!(db.replace_files(root_id, &[]).unwrap(), 0);
    assert_eq!(db.count_files(FileFilter::Root(root_id)).unwrap(), 0);
}

#[test]
fn test_query_files_by_directory() {
    let (db, _) = setup_db_with_files(
        "/data",
        &[
            ("/data", "top.txt", 1),
            ("/data/sub", "a.txt", 2),
            ("/data/sub", "b.txt", 3),
        ],
    );
    let files = db.query_files(FileFilter::Directory("/data/sub/")).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_query_files_name_or_directory_contains() {
    let (db, _) = setup_db_with_files(
        "/data",
        &[
            ("/data", "report.pdf", 1),
            ("/data/reports", "summary.txt", 2),
            ("/data/misc", "notes.txt", 3),
        ],
    );
    let files = db
        .query_files(FileFilter::NameOrDirectoryContains("report"))
        .unwrap();
    let mut names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["report.pdf", "summary.txt"]);
}

#[test]
fn test_like_wildcards_match_literally() {
    let (db, _) = setup_db_with_files(
        "/data",
        &[("/data", "50%_off.txt", 1), ("/data", "500ff.txt", 2)],
    );
    let files = db
        .query_files(FileFilter::NameOrDirectoryContains("%_"))
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "50%_off.txt");
}

#[test]
fn test_distinct_directories() {
    let (db, _) = setup_db_with_files(
        "/data",
        &[
            ("/data", "a.txt", 1),
            ("/data", "b.txt", 1),
            ("/data/sub", "c.txt", 1),
            ("/data/sub", "d.txt", 1),
        ],
    );
    let all = db.list_distinct_directories().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&normalize_path("/data")));
    assert!(all.contains(&normalize_path("/data/sub")));

    let matching = db
        .query_distinct_directories(DirectoryFilter::Contains("sub"))
        .unwrap();
    assert_eq!(matching, vec![normalize_path("/data/sub")]);
}

#[test]
fn test_null_size_round_trips() {
    let db = Database::open_in_memory().unwrap();
    let root_id = db.add_root("/data").unwrap();
    let mut record = make_test_file_record(root_id, "/data", "unknown.bin", 0);
    record.size_bytes = None;
    db.replace_files(root_id, &[record]).unwrap();

    let stored = db.query_files(FileFilter::All).unwrap();
    assert_eq!(stored[0].size_bytes, None);
    assert_eq!(stored[0].size_display(), "0 B");
}
