//! Task item domain models.

use crate::error::{YunoError, YunoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use yuno_db::queries::task_items::{LinkedTaskItemRow, TaskItemRow};

/// Lifecycle of a checklist entry. Stored as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskItemStatus {
    Pending = 0,
    Completed = 1,
    Canceled = 2,
}

impl TaskItemStatus {
    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Whether the item still occupies a position in its tasks.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl TryFrom<i64> for TaskItemStatus {
    type Error = YunoError;

    fn try_from(value: i64) -> YunoResult<Self> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Completed),
            2 => Ok(Self::Canceled),
            other => Err(YunoError::InvalidStatus(other.to_string())),
        }
    }
}

impl From<TaskItemStatus> for i64 {
    fn from(status: TaskItemStatus) -> Self {
        status as i64
    }
}

impl FromStr for TaskItemStatus {
    type Err = YunoError;

    fn from_str(s: &str) -> YunoResult<Self> {
        match s.to_lowercase().as_str() {
            "pending" | "open" => Ok(Self::Pending),
            "completed" | "done" => Ok(Self::Completed),
            "canceled" | "cancelled" | "cancel" => Ok(Self::Canceled),
            _ => Err(YunoError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for TaskItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A checklist entry, possibly shared by several tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: i64,
    pub content: String,
    pub status: TaskItemStatus,
}

impl TaskItem {
    /// Create from database row.
    pub fn from_row(row: TaskItemRow) -> YunoResult<Self> {
        Ok(Self {
            id: row.id,
            content: row.content,
            status: TaskItemStatus::try_from(row.status)?,
        })
    }
}

/// A checklist entry with its position in one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedTaskItem {
    pub id: i64,
    pub content: String,
    pub status: TaskItemStatus,
    /// `None` once the item is no longer pending.
    pub sequence: Option<i64>,
}

impl LinkedTaskItem {
    /// Create from database row.
    pub fn from_row(row: LinkedTaskItemRow) -> YunoResult<Self> {
        Ok(Self {
            id: row.id,
            content: row.content,
            status: TaskItemStatus::try_from(row.status)?,
            sequence: row.sequence,
        })
    }
}
