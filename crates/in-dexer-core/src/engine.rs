use crate::error::Error;
use crate::hierarchy::DirectoryTree;
use crate::platform::normalize_path;
use crate::progress::{ProgressReporter, SilentReporter};
use crate::scanner::{self, SkipCounts};
use crate::search::{self, FileHit, SearchMode, SearchResults};
use crate::storage::{Database, FileFilter};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Indexes roots into a store and answers hierarchy and search queries.
///
/// Operations run to completion on the calling thread and must not be
/// invoked concurrently on the same store.
pub struct IndexEngine {
    db: Database,
    reporter: Box<dyn ProgressReporter>,
}

#[derive(Debug, Clone)]
pub struct IndexReport {
    pub root: String,
    pub root_id: i64,
    pub files_indexed: usize,
    pub skipped: SkipCounts,
    pub unreadable_dirs: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub enum RootOutcome {
    Indexed(IndexReport),
    Failed { path: String, error: String },
}

#[derive(Debug, Clone, Default)]
pub struct RefreshSummary {
    pub outcomes: Vec<RootOutcome>,
}

impl RefreshSummary {
    /// Files stored across all roots; failed roots count as zero.
    pub fn total_files(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                RootOutcome::Indexed(report) => report.files_indexed,
                RootOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn failed_roots(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, RootOutcome::Failed { .. }))
            .count()
    }
}

impl IndexEngine {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            reporter: Box::new(SilentReporter),
        }
    }

    pub fn with_reporter<R: ProgressReporter + 'static>(mut self, reporter: R) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Register a root without walking it.
    pub fn add_root(&self, path: &str) -> Result<i64, Error> {
        Ok(self.db.add_root(path)?)
    }

    /// Register `path` if needed, walk it, and replace its stored files with
    /// what the walk found.
    ///
    /// A root that can no longer be listed still has its stored files
    /// cleared before the error is returned.
    pub fn index_root(&self, path: &str) -> Result<IndexReport, Error> {
        let root = normalize_path(path);
        let root_id = self.db.add_root(&root)?;

        self.reporter.on_root_start(&root);
        let start = Instant::now();

        let summary = match scanner::walk_root(root_id, &root, self.reporter.as_ref()) {
            Ok(summary) => summary,
            Err(err) => {
                self.db.replace_files(root_id, &[])?;
                self.reporter.on_root_failed(&root, &err.to_string());
                return Err(err);
            }
        };
        let files_indexed = self.db.replace_files(root_id, &summary.records)?;
        let duration = start.elapsed();

        info!(
            "Indexed {} files under {} in {:.2}s",
            files_indexed,
            root,
            duration.as_secs_f64()
        );
        if summary.skipped.total() > 0 || summary.unreadable_dirs > 0 {
            debug!(
                "{}: {} files skipped ({:?}), {} unreadable directories",
                root,
                summary.skipped.total(),
                summary.skipped,
                summary.unreadable_dirs
            );
        }
        self.reporter
            .on_root_complete(&root, files_indexed, duration.as_secs_f64());

        Ok(IndexReport {
            root,
            root_id,
            files_indexed,
            skipped: summary.skipped,
            unreadable_dirs: summary.unreadable_dirs,
            duration,
        })
    }

    /// Re-index every registered root in turn. A root that fails is logged
    /// and recorded, and the remaining roots are still processed.
    pub fn refresh_all(&self) -> Result<RefreshSummary, Error> {
        let roots = self.db.list_roots()?;
        info!("Refreshing {} indexed folders", roots.len());

        let mut summary = RefreshSummary::default();
        for root in roots {
            let outcome = match self.index_root(&root.path) {
                Ok(report) => RootOutcome::Indexed(report),
                Err(err) => {
                    error!("Error indexing {}: {}", root.path, err);
                    RootOutcome::Failed {
                        path: root.path,
                        error: err.to_string(),
                    }
                }
            };
            summary.outcomes.push(outcome);
        }

        info!("Refresh complete. {} files indexed.", summary.total_files());
        Ok(summary)
    }

    /// Unregister a root and drop its files. Absent roots are a no-op.
    pub fn remove_root(&self, path: &str) -> Result<bool, Error> {
        Ok(self.db.remove_root(path)?)
    }

    /// Folder tree over every root and every directory holding a stored file.
    pub fn build_hierarchy(&self) -> Result<DirectoryTree, Error> {
        let mut paths: BTreeSet<String> = self
            .db
            .list_distinct_directories()?
            .iter()
            .map(normalize_path)
            .collect();
        paths.extend(self.db.list_roots()?.iter().map(|root| normalize_path(&root.path)));

        let tree = DirectoryTree::from_paths(&paths);
        debug!("Built hierarchy: {} paths, {} nodes", paths.len(), tree.len());
        Ok(tree)
    }

    pub fn search(&self, term: &str, mode: SearchMode) -> Result<SearchResults, Error> {
        Ok(search::search(&self.db, term, mode)?)
    }

    /// Files stored directly in `path`, as shown when a folder is selected.
    pub fn files_in_directory(&self, path: &str) -> Result<Vec<FileHit>, Error> {
        Ok(self
            .db
            .query_files(FileFilter::Directory(path))?
            .into_iter()
            .map(FileHit::from)
            .collect())
    }
}
