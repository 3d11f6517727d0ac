use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::domain::{ReviewKey, ReviewTask, TaskStatus};

/// Process-wide registry of in-flight and finished pipeline runs, keyed by
/// (subject, recording). The only mutable state shared across concurrent
/// runs; every read-modify-write happens under one lock so a completion and
/// a concurrent status poll cannot interleave into a lost update.
pub struct TaskTracker {
    tasks: RwLock<HashMap<ReviewKey, ReviewTask>>,
}

#[derive(Debug, thiserror::Error)]
#[error("a run is already processing for {0}")]
pub struct DuplicateRun(pub ReviewKey);

impl TaskTracker {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Atomic check-and-insert. Refuses while a run is in flight for the key;
    /// terminal records are replaced with a fresh one (new start timestamp,
    /// progress back to zero).
    pub fn try_begin(&self, key: &ReviewKey) -> Result<ReviewTask, DuplicateRun> {
        let mut tasks = self.write();
        if let Some(existing) = tasks.get(key)
            && !existing.status.is_terminal()
        {
            return Err(DuplicateRun(key.clone()));
        }

        let task = ReviewTask::new(key.clone());
        tasks.insert(key.clone(), task.clone());
        Ok(task)
    }

    /// Advances progress and stage message. Progress never moves backwards
    /// within a run; stale updates after a terminal transition are dropped.
    pub fn update(&self, key: &ReviewKey, progress: f32, message: impl Into<String>) {
        let mut tasks = self.write();
        if let Some(task) = tasks.get_mut(key)
            && task.status == TaskStatus::Processing
        {
            if progress > task.progress {
                task.progress = progress.min(1.0);
            }
            task.message = message.into();
        }
    }

    pub fn complete(&self, key: &ReviewKey) {
        let mut tasks = self.write();
        if let Some(task) = tasks.get_mut(key)
            && task.status == TaskStatus::Processing
        {
            task.status = TaskStatus::Completed;
            task.progress = 1.0;
            task.message = "Completed".to_string();
            task.finished_at = Some(Utc::now());
        }
    }

    pub fn fail(&self, key: &ReviewKey, error: &str) {
        let mut tasks = self.write();
        if let Some(task) = tasks.get_mut(key)
            && task.status == TaskStatus::Processing
        {
            task.status = TaskStatus::Error;
            task.message = "Failed".to_string();
            task.error = Some(error.to_string());
            task.finished_at = Some(Utc::now());
        }
    }

    pub fn get(&self, key: &ReviewKey) -> Option<ReviewTask> {
        self.read().get(key).cloned()
    }

    /// Drops the record entirely, e.g. when the underlying recording is
    /// deleted. Records are never expired on their own.
    pub fn evict(&self, key: &ReviewKey) {
        self.write().remove(key);
    }

    /// Drops every record that refers to the given recording, across all
    /// subjects.
    pub fn evict_object(&self, object_id: &str) {
        self.write().retain(|key, _| key.object_id() != object_id);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ReviewKey, ReviewTask>> {
        self.tasks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ReviewKey, ReviewTask>> {
        self.tasks.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for TaskTracker {
    fn default() -> Self {
        Self::new()
    }
}
