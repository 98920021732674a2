use std::collections::HashMap;
use tokio::sync::RwLock;
use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::types::{Task, TaskStatus};

/// Process-wide task map. Every structural mutation and every status
/// transition happens behind the lock, so a task has exactly one effective
/// writer: the first terminal transition wins and later ones are refused.
pub struct TaskRegistry {
    tasks: RwLock<HashMap<String, Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a fresh task in `processing` state and return a snapshot of it.
    pub async fn create(&self, target_lang: &str) -> Task {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            status: TaskStatus::Processing,
            target_lang: target_lang.to_string(),
            transcription: None,
            translation: None,
            error: None,
            created_at: Utc::now(),
            completion_time: None,
        };

        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task.clone());
        info!("Created task {} (target_lang={})", task.id, task.target_lang);
        task
    }

    /// Snapshot of a task, if it is still registered.
    pub async fn get(&self, task_id: &str) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(task_id).cloned()
    }

    /// Transition a task to `completed` with both result texts. Returns false
    /// when the task is unknown or already terminal.
    pub async fn complete(&self, task_id: &str, transcription: String, translation: String) -> bool {
        let mut tasks = self.tasks.write().await;
        let Some(task) = Self::writable(&mut tasks, task_id) else {
            return false;
        };
        task.transcription = Some(transcription);
        task.translation = Some(translation);
        task.status = TaskStatus::Completed;
        task.completion_time = Some(Utc::now());
        info!("Task {} completed", task_id);
        true
    }

    /// Transition a task to `failed` with an error message. Returns false
    /// when the task is unknown or already terminal.
    pub async fn fail(&self, task_id: &str, error: String) -> bool {
        let mut tasks = self.tasks.write().await;
        let Some(task) = Self::writable(&mut tasks, task_id) else {
            return false;
        };
        task.error = Some(error);
        task.status = TaskStatus::Failed;
        task.completion_time = Some(Utc::now());
        info!("Task {} failed", task_id);
        true
    }

    fn writable<'a>(tasks: &'a mut HashMap<String, Task>, task_id: &str) -> Option<&'a mut Task> {
        match tasks.get_mut(task_id) {
            None => {
                warn!("Ignoring transition for unknown task {}", task_id);
                None
            }
            Some(task) if task.status.is_terminal() => {
                warn!("Refusing transition for terminal task {} ({})", task_id, task.status);
                None
            }
            Some(task) => Some(task),
        }
    }

    /// Remove terminal tasks whose completion_time is older than `retention`.
    /// Non-terminal tasks and younger terminal tasks are untouched.
    pub async fn sweep_expired(&self, retention: Duration) -> usize {
        let cutoff = Utc::now() - retention;
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, task| {
            !(task.status.is_terminal()
                && task.completion_time.map_or(false, |done| done < cutoff))
        });
        before - tasks.len()
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn override_completion_time(&self, task_id: &str, when: chrono::DateTime<Utc>) {
        let mut tasks = self.tasks.write().await;
        if let Some(task) = tasks.get_mut(task_id) {
            task.completion_time = Some(when);
        }
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
