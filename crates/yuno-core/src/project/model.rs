//! Project domain models.

use serde::{Deserialize, Serialize};
use yuno_db::queries::projects::ProjectRow;

/// A top-level project holding an ordered list of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub sequence: i64,
}

impl Project {
    /// Create from database row.
    pub fn from_row(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            sequence: row.sequence,
        }
    }
}
