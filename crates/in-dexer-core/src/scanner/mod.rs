mod walk;

pub use walk::{format_timestamp, walk_root, SkipCounts, SkipReason, WalkSummary, TIMESTAMP_FORMAT};
