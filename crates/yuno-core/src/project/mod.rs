//! Project management.

pub mod model;

use crate::error::{require_text, YunoError, YunoResult};
use model::Project;
use tracing::info;
use yuno_db::queries::projects as queries;
use yuno_db::DbPool;

fn not_found(id: i64) -> impl FnOnce(yuno_db::DbError) -> YunoError {
    move |e| YunoError::or_not_found(e, || YunoError::ProjectNotFound(id))
}

/// Create a new project at the end of the list.
pub fn create_project(pool: &DbPool, title: &str, description: Option<&str>) -> YunoResult<Project> {
    require_text("Project title", title)?;

    let id = queries::create_project(pool, title.trim(), description)?;
    info!(project_id = id, title = %title, "Project created");

    get_project(pool, id)
}

/// Get a project by ID.
pub fn get_project(pool: &DbPool, id: i64) -> YunoResult<Project> {
    let row = queries::get_project(pool, id).map_err(not_found(id))?;
    Ok(Project::from_row(row))
}

/// List all projects in display order.
pub fn list_projects(pool: &DbPool) -> YunoResult<Vec<Project>> {
    let rows = queries::list_projects(pool)?;
    Ok(rows.into_iter().map(Project::from_row).collect())
}

/// Replace a project's title and description.
pub fn update_project_content(
    pool: &DbPool,
    id: i64,
    title: &str,
    description: Option<&str>,
) -> YunoResult<Project> {
    require_text("Project title", title)?;
    queries::update_project_content(pool, id, title.trim(), description).map_err(not_found(id))?;
    get_project(pool, id)
}

/// Move a project to a 1-based position.
pub fn move_project(pool: &DbPool, id: i64, sequence: i64) -> YunoResult<()> {
    queries::update_project_sequence(pool, id, sequence).map_err(not_found(id))?;
    Ok(())
}

/// Delete a project together with its tasks.
pub fn delete_project(pool: &DbPool, id: i64) -> YunoResult<()> {
    queries::delete_project(pool, id).map_err(not_found(id))?;
    info!(project_id = id, "Project deleted");
    Ok(())
}
