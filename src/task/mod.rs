pub mod registry;
pub mod sweeper;
pub mod types;

pub use registry::TaskRegistry;
pub use sweeper::TaskSweeper;
pub use types::{Task, TaskStatus};

/// How long terminal tasks stay queryable before the sweeper may remove them.
pub const RETENTION_SECS: i64 = 3600;
