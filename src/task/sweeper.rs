use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

use super::registry::TaskRegistry;
use super::RETENTION_SECS;

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Periodic retention sweep over the task registry. Runs as a background
/// tokio task for the life of the process.
pub struct TaskSweeper {
    registry: Arc<TaskRegistry>,
    interval: Duration,
    retention: chrono::Duration,
}

impl TaskSweeper {
    pub fn new(registry: Arc<TaskRegistry>) -> Self {
        Self {
            registry,
            interval: SWEEP_INTERVAL,
            retention: chrono::Duration::seconds(RETENTION_SECS),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_retention(mut self, retention: chrono::Duration) -> Self {
        self.retention = retention;
        self
    }

    pub async fn run(&self) {
        loop {
            sleep(self.interval).await;
            let removed = self.registry.sweep_expired(self.retention).await;
            if removed > 0 {
                info!("Swept {} expired tasks", removed);
            }
        }
    }
}
