/// Trait for reporting indexing progress.
///
/// The CLI implements it with an indicatif spinner; tests use `SilentReporter`.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_root_start(&self, _root: &str) {}
    fn on_walk_progress(&self, _files_found: usize, _current_dir: &str) {}
    fn on_root_complete(&self, _root: &str, _files_indexed: usize, _duration_secs: f64) {}
    fn on_root_failed(&self, _root: &str, _error: &str) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
