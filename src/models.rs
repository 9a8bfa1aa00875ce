//! Task and time-tracking row shapes.
//!
//! Rows are owned by the backend; this crate only reads and forwards them, so
//! the types mirror the wire format and carry no persistence logic.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Present only when the query embedded the task's sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_sessions: Option<Vec<TimeSession>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TimeSession {
    /// A session without an end time is still being tracked.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }
}

/// A task with its sessions always loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithSessions {
    #[serde(flatten)]
    pub task: Task,
    pub time_sessions: Vec<TimeSession>,
}

impl TaskWithSessions {
    /// Sum of recorded durations. Running sessions have none yet and count
    /// as zero.
    #[must_use]
    pub fn total_tracked_seconds(&self) -> i64 {
        self.time_sessions
            .iter()
            .filter_map(|s| s.duration_seconds)
            .sum()
    }
}

impl From<Task> for TaskWithSessions {
    fn from(mut task: Task) -> Self {
        let time_sessions = task.time_sessions.take().unwrap_or_default();
        Self { task, time_sessions }
    }
}

/// Fields a user submits when creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFormData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
