pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod hierarchy;
pub mod platform;
pub mod progress;
pub mod scanner;
pub mod search;
pub mod storage;

pub use config::AppConfig;
pub use engine::{IndexEngine, IndexReport, RefreshSummary, RootOutcome};
pub use error::Error;
pub use format::format_size;
pub use hierarchy::{DirectoryNode, DirectoryTree};
pub use progress::{ProgressReporter, SilentReporter};
pub use search::{FileHit, FolderHit, SearchMode, SearchResults};
