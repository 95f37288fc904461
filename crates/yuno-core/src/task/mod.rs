//! Task management.

pub mod model;

use crate::error::{require_text, YunoError, YunoResult};
use model::Task;
use tracing::info;
use yuno_db::queries::tasks as queries;
use yuno_db::DbPool;

fn not_found(id: i64) -> impl FnOnce(yuno_db::DbError) -> YunoError {
    move |e| YunoError::or_not_found(e, || YunoError::TaskNotFound(id))
}

/// Create a new task at the end of a project.
pub fn create_task(
    pool: &DbPool,
    project_id: i64,
    title: &str,
    description: Option<&str>,
) -> YunoResult<Task> {
    require_text("Task title", title)?;
    // Surface a missing project as such instead of a constraint failure.
    crate::project::get_project(pool, project_id)?;

    let id = queries::create_task(pool, project_id, title.trim(), description)?;
    info!(task_id = id, project_id, title = %title, "Task created");

    get_task(pool, id)
}

/// Get a task by ID.
pub fn get_task(pool: &DbPool, id: i64) -> YunoResult<Task> {
    let row = queries::get_task(pool, id).map_err(not_found(id))?;
    Ok(Task::from_row(row))
}

/// List a project's tasks in display order.
pub fn list_tasks(pool: &DbPool, project_id: i64) -> YunoResult<Vec<Task>> {
    crate::project::get_project(pool, project_id)?;
    let rows = queries::list_tasks(pool, project_id)?;
    Ok(rows.into_iter().map(Task::from_row).collect())
}

/// Replace a task's title and description.
pub fn update_task_content(
    pool: &DbPool,
    id: i64,
    title: &str,
    description: Option<&str>,
) -> YunoResult<Task> {
    require_text("Task title", title)?;
    queries::update_task_content(pool, id, title.trim(), description).map_err(not_found(id))?;
    get_task(pool, id)
}

/// Move a task to a 1-based position within its project.
pub fn move_task(pool: &DbPool, id: i64, sequence: i64) -> YunoResult<()> {
    queries::update_task_sequence(pool, id, sequence).map_err(not_found(id))?;
    Ok(())
}

/// Delete a task. Its items stay available to other tasks.
pub fn delete_task(pool: &DbPool, id: i64) -> YunoResult<()> {
    queries::delete_task(pool, id).map_err(not_found(id))?;
    info!(task_id = id, "Task deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project;

    fn setup() -> (DbPool, i64) {
        let pool = DbPool::in_memory().unwrap();
        yuno_db::migrations::run_migrations(&pool).unwrap();
        let project = project::create_project(&pool, "Inbox", None).unwrap();
        (pool, project.id)
    }

    #[test]
    fn test_create_in_missing_project() {
        let (pool, _) = setup();
        assert!(matches!(
            create_task(&pool, 12, "Orphan", None),
            Err(YunoError::ProjectNotFound(12))
        ));
    }

    #[test]
    fn test_move_and_list() {
        let (pool, project_id) = setup();
        let a = create_task(&pool, project_id, "a", None).unwrap();
        let b = create_task(&pool, project_id, "b", None).unwrap();

        move_task(&pool, b.id, 1).unwrap();
        let titles: Vec<String> = list_tasks(&pool, project_id)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["b", "a"]);
        assert_eq!(get_task(&pool, a.id).unwrap().sequence, 2);
    }

    #[test]
    fn test_update_and_delete() {
        let (pool, project_id) = setup();
        let task = create_task(&pool, project_id, "draft", None).unwrap();

        let task = update_task_content(&pool, task.id, "final", Some("ready")).unwrap();
        assert_eq!(task.description.as_deref(), Some("ready"));

        delete_task(&pool, task.id).unwrap();
        assert!(matches!(get_task(&pool, task.id), Err(YunoError::TaskNotFound(_))));
        assert!(matches!(move_task(&pool, task.id, 1), Err(YunoError::TaskNotFound(_))));
    }
}
