use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Completed and failed are final; nothing transitions out of them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Processing)
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Processing => write!(f, "processing"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One record → transcribe → translate unit of work, tracked by id until a
/// polling client has had time to read its terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub status: TaskStatus,
    /// Captured at creation time; never read from shared state.
    pub target_lang: String,
    pub transcription: Option<String>,
    pub translation: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completion_time: Option<DateTime<Utc>>,
}
