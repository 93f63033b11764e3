use crate::error::Error;
use crate::platform::normalize_path;
use crate::progress::ProgressReporter;
use crate::storage::FileRecord;
use chrono::{DateTime, Local};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PROGRESS_INTERVAL: usize = 250;

/// Why a listed file did not make it into the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Gone between listing and stat, or a dangling symlink.
    Missing,
    PermissionDenied,
    StatFailed,
}

impl SkipReason {
    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SkipReason::Missing,
            io::ErrorKind::PermissionDenied => SkipReason::PermissionDenied,
            _ => SkipReason::StatFailed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub missing: usize,
    pub permission_denied: usize,
    pub stat_failed: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Missing => self.missing += 1,
            SkipReason::PermissionDenied => self.permission_denied += 1,
            SkipReason::StatFailed => self.stat_failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing + self.permission_denied + self.stat_failed
    }
}

#[derive(Debug, Default)]
pub struct WalkSummary {
    pub records: Vec<FileRecord>,
    pub skipped: SkipCounts,
    pub unreadable_dirs: usize,
}

/// Recursively collect a `FileRecord` for every file under `root`.
///
/// Directory symlinks are not descended; file entries are stat'ed through
/// symlinks. Files that fail to stat are counted in `skipped`, subdirectories
/// that cannot be listed in `unreadable_dirs`. Only a root that cannot be
/// listed at all is an error.
pub fn walk_root(
    root_id: i64,
    root: &str,
    reporter: &dyn ProgressReporter,
) -> Result<WalkSummary, Error> {
    let root_path = Path::new(root);
    let metadata = fs::metadata(root_path).map_err(|source| Error::RootUnreadable {
        path: root.to_string(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(root.to_string()));
    }
    fs::read_dir(root_path).map_err(|source| Error::RootUnreadable {
        path: root.to_string(),
        source,
    })?;

    let mut summary = WalkSummary::default();

    for entry_result in WalkDir::new(root_path)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                record_walk_error(&mut summary, root_path, &err);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                debug!("Skipping {}: {}", path.display(), err);
                summary.skipped.record(SkipReason::from_io(&err));
                continue;
            }
        };

        // Symlinked directories are listed but never walked or stored.
        if metadata.is_dir() {
            continue;
        }

        let directory = normalize_path(path.parent().unwrap_or(root_path));
        summary.records.push(FileRecord {
            id: 0,
            folder_id: root_id,
            name: entry.file_name().to_string_lossy().into_owned(),
            directory,
            size_bytes: i64::try_from(metadata.len()).ok(),
            creation_date: format_timestamp(creation_time(&metadata)),
            modification_date: format_timestamp(metadata.modified()),
        });

        if summary.records.len() % PROGRESS_INTERVAL == 0 {
            if let Some(last) = summary.records.last() {
                reporter.on_walk_progress(summary.records.len(), &last.directory);
            }
        }
    }

    Ok(summary)
}

/// Directory listing failures count as unreadable directories; anything
/// else walkdir reports is charged to the entry that caused it.
fn record_walk_error(summary: &mut WalkSummary, root: &Path, err: &walkdir::Error) {
    let path = err.path().unwrap_or(root);
    if err.loop_ancestor().is_none() && path.is_dir() {
        warn!("Skipping unreadable directory {}: {}", path.display(), err);
        summary.unreadable_dirs += 1;
        return;
    }

    debug!("Skipping {}: {}", path.display(), err);
    let reason = err
        .io_error()
        .map(SkipReason::from_io)
        .unwrap_or(SkipReason::StatFailed);
    summary.skipped.record(reason);
}

pub fn format_timestamp(time: io::Result<SystemTime>) -> Option<String> {
    time.ok()
        .map(|t| DateTime::<Local>::from(t).format(TIMESTAMP_FORMAT).to_string())
}

/// Birth time where the platform records it, otherwise the inode change time.
fn creation_time(metadata: &Metadata) -> io::Result<SystemTime> {
    metadata
        .created()
        .or_else(|err| change_time(metadata).ok_or(err))
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn change_time(_metadata: &Metadata) -> Option<SystemTime> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use tempfile::tempdir;

    #[test]
    fn test_skip_counts() {
        let mut counts = SkipCounts::default();
        counts.record(SkipReason::Missing);
        counts.record(SkipReason::Missing);
        counts.record(SkipReason::PermissionDenied);
        assert_eq!(counts.missing, 2);
        assert_eq!(counts.permission_denied, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_skip_reason_from_io() {
        let missing = io::Error::from(io::ErrorKind::NotFound);
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        let other = io::Error::from(io::ErrorKind::InvalidData);
        assert_eq!(SkipReason::from_io(&missing), SkipReason::Missing);
        assert_eq!(SkipReason::from_io(&denied), SkipReason::PermissionDenied);
        assert_eq!(SkipReason::from_io(&other), SkipReason::StatFailed);
    }

    #[test]
    fn test_walk_collects_nested_files() {
        let tmp = tempdir().unwrap();
        let root = normalize_path(tmp.path());
        fs::write(tmp.path().join("x.txt"), vec![0u8; 500]).unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("y.txt"), vec![0u8; 2048]).unwrap();

        let summary = walk_root(7, &root, &SilentReporter).unwrap();
        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.skipped.total(), 0);

        let x = summary.records.iter().find(|r| r.name == "x.txt").unwrap();
        assert_eq!(x.folder_id, 7);
        assert_eq!(x.directory, root);
        assert_eq!(x.size_bytes, Some(500));
        assert_eq!(x.modification_date.as_ref().map(|d| d.len()), Some(19));

        let y = summary.records.iter().find(|r| r.name == "y.txt").unwrap();
        assert_eq!(y.directory, normalize_path(tmp.path().join("sub")));
        assert_eq!(y.size_bytes, Some(2048));
    }

    #[test]
    fn test_walk_missing_root_is_error() {
        let tmp = tempdir().unwrap();
        let missing = normalize_path(tmp.path().join("nope"));
        let result = walk_root(1, &missing, &SilentReporter);
        assert!(matches!(result, Err(Error::RootUnreadable { .. })));
    }

    #[test]
    fn test_walk_file_root_is_error() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, "hello").unwrap();
        let result = walk_root(1, &normalize_path(&file), &SilentReporter);
        assert!(matches!(result, Err(Error::NotADirectory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_dangling_symlink() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("real.txt"), "data").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone.txt"), tmp.path().join("dangling"))
            .unwrap();

        let summary = walk_root(1, &normalize_path(tmp.path()), &SilentReporter).unwrap();
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.records[0].name, "real.txt");
        assert_eq!(summary.skipped.missing, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_files_it_may_not_stat() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret.txt"), "data").unwrap();
        fs::write(tmp.path().join("open.txt"), "data").unwrap();

        // Listable but not searchable: names are visible, stat is refused.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        if fs::metadata(locked.join("secret.txt")).is_ok() {
            // Permission bits are not enforced (running as root).
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let summary = walk_root(1, &normalize_path(tmp.path()), &SilentReporter);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let summary = summary.unwrap();

        let names: Vec<&str> = summary.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["open.txt"]);
        assert!(summary.skipped.permission_denied + summary.unreadable_dirs > 0);
        assert_eq!(summary.skipped.missing, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_counts_unlistable_subdirectory() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let sealed = tmp.path().join("sealed");
        fs::create_dir(&sealed).unwrap();
        fs::write(sealed.join("hidden.txt"), "data").unwrap();
        fs::write(tmp.path().join("open.txt"), "data").unwrap();

        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&sealed).is_ok() {
            fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let summary = walk_root(1, &normalize_path(tmp.path()), &SilentReporter);
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
        let summary = summary.unwrap();

        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.unreadable_dirs, 1);
        assert_eq!(summary.skipped.total(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_descend_directory_symlinks() {
        let tmp = tempdir().unwrap();
        let target = tempdir().unwrap();
        fs::write(target.path().join("outside.txt"), "data").unwrap();
        fs::write(tmp.path().join("inside.txt"), "data").unwrap();
        std::os::unix::fs::symlink(target.path(), tmp.path().join("link")).unwrap();

        let summary = walk_root(1, &normalize_path(tmp.path()), &SilentReporter).unwrap();
        let names: Vec<&str> = summary.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["inside.txt"]);
    }
}
