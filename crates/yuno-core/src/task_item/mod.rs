//! Task items: checklist entries that can be shared between tasks.

pub mod model;

use crate::error::{require_text, YunoError, YunoResult};
use model::{LinkedTaskItem, TaskItem, TaskItemStatus};
use tracing::info;
use yuno_db::queries::task_items as queries;
use yuno_db::DbPool;

fn not_found(id: i64) -> impl FnOnce(yuno_db::DbError) -> YunoError {
    move |e| YunoError::or_not_found(e, || YunoError::TaskItemNotFound(id))
}

/// Create an item and append it to a task.
pub fn create_task_item(pool: &DbPool, task_id: i64, content: &str) -> YunoResult<TaskItem> {
    require_text("Item content", content)?;
    crate::task::get_task(pool, task_id)?;

    let id = queries::create_task_item(pool, task_id, content.trim())?;
    info!(item_id = id, task_id, "Task item created");

    get_task_item(pool, id)
}

/// Attach an existing item to another task. Returns its position there.
pub fn link_task_item(pool: &DbPool, task_id: i64, item_id: i64) -> YunoResult<Option<i64>> {
    crate::task::get_task(pool, task_id)?;
    let sequence = queries::link_task_item(pool, task_id, item_id).map_err(not_found(item_id))?;
    Ok(sequence)
}

/// Get an item by ID.
pub fn get_task_item(pool: &DbPool, id: i64) -> YunoResult<TaskItem> {
    let row = queries::get_task_item(pool, id).map_err(not_found(id))?;
    TaskItem::from_row(row)
}

/// List a task's items, pending ones first in order.
pub fn list_task_items(pool: &DbPool, task_id: i64) -> YunoResult<Vec<LinkedTaskItem>> {
    crate::task::get_task(pool, task_id)?;
    queries::list_task_items(pool, task_id)?
        .into_iter()
        .map(LinkedTaskItem::from_row)
        .collect()
}

/// Replace an item's content and status.
pub fn update_task_item(
    pool: &DbPool,
    id: i64,
    content: &str,
    status: TaskItemStatus,
) -> YunoResult<TaskItem> {
    require_text("Item content", content)?;
    queries::update_task_item(pool, id, content.trim(), status.into()).map_err(not_found(id))?;
    get_task_item(pool, id)
}

/// Change only an item's status.
pub fn set_status(pool: &DbPool, id: i64, status: TaskItemStatus) -> YunoResult<TaskItem> {
    let item = get_task_item(pool, id)?;
    update_task_item(pool, id, &item.content, status)
}

/// Move a pending item to a 1-based position within a task.
pub fn move_task_item(pool: &DbPool, task_id: i64, item_id: i64, sequence: i64) -> YunoResult<()> {
    crate::task::get_task(pool, task_id)?;
    queries::update_task_item_sequence(pool, task_id, item_id, sequence)
        .map_err(not_found(item_id))?;
    Ok(())
}

/// Delete an item from every task.
pub fn delete_task_item(pool: &DbPool, id: i64) -> YunoResult<()> {
    queries::delete_task_item(pool, id).map_err(not_found(id))?;
    info!(item_id = id, "Task item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{project, task};

    fn setup() -> (DbPool, i64) {
        let pool = DbPool::in_memory().unwrap();
        yuno_db::migrations::run_migrations(&pool).unwrap();
        let project = project::create_project(&pool, "Home", None).unwrap();
        let task = task::create_task(&pool, project.id, "Groceries", None).unwrap();
        (pool, task.id)
    }

    #[test]
    fn test_complete_and_cancel() {
        let (pool, task_id) = setup();
        let milk = create_task_item(&pool, task_id, "milk").unwrap();
        let eggs = create_task_item(&pool, task_id, "eggs").unwrap();
        create_task_item(&pool, task_id, "bread").unwrap();

        set_status(&pool, milk.id, TaskItemStatus::Completed).unwrap();
        set_status(&pool, eggs.id, TaskItemStatus::Canceled).unwrap();

        let items = list_task_items(&pool, task_id).unwrap();
        assert_eq!(items[0].content, "bread");
        assert_eq!(items[0].sequence, Some(1));
        assert!(items[1..].iter().all(|i| i.sequence.is_none()));
        assert!(items[1..].iter().all(|i| !i.status.is_pending()));
    }

    #[test]
    fn test_missing_references() {
        let (pool, task_id) = setup();
        assert!(matches!(
            create_task_item(&pool, 99, "x"),
            Err(YunoError::TaskNotFound(99))
        ));
        assert!(matches!(
            link_task_item(&pool, task_id, 42),
            Err(YunoError::TaskItemNotFound(42))
        ));
        assert!(matches!(
            set_status(&pool, 42, TaskItemStatus::Completed),
            Err(YunoError::TaskItemNotFound(42))
        ));
    }

    #[test]
    fn test_move_item() {
        let (pool, task_id) = setup();
        let a = create_task_item(&pool, task_id, "a").unwrap();
        create_task_item(&pool, task_id, "b").unwrap();

        move_task_item(&pool, task_id, a.id, 2).unwrap();
        let items = list_task_items(&pool, task_id).unwrap();
        assert_eq!(items[1].id, a.id);
    }

    #[test]
    fn test_delete_item() {
        let (pool, task_id) = setup();
        let a = create_task_item(&pool, task_id, "a").unwrap();

        delete_task_item(&pool, a.id).unwrap();
        assert!(list_task_items(&pool, task_id).unwrap().is_empty());
        assert!(matches!(
            delete_task_item(&pool, a.id),
            Err(YunoError::TaskItemNotFound(_))
        ));
    }
}
