//! Task item (checklist entry) database queries.
//!
//! Items live in `task_items` and are attached to tasks through
//! `task_item_links`, so one item can appear in several tasks. Only pending
//! items carry a sequence; finished items keep their link with a NULL
//! sequence and sort after the pending ones.

use super::{move_to, write_sequences};
use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// Stored status value of a pending item.
pub const STATUS_PENDING: i64 = 0;

/// Task item row from database.
#[derive(Debug, Clone)]
pub struct TaskItemRow {
    pub id: i64,
    pub content: String,
    pub status: i64,
}

/// Task item as seen from one task, with its position in that task.
#[derive(Debug, Clone)]
pub struct LinkedTaskItemRow {
    pub id: i64,
    pub content: String,
    pub status: i64,
    pub sequence: Option<i64>,
}

fn item_not_found(id: i64) -> impl FnOnce(rusqlite::Error) -> DbError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Task item: {}", id)),
        e => DbError::Connection(e),
    }
}

fn next_sequence(conn: &Connection, task_id: i64) -> DbResult<i64> {
    let max: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sequence), 0) FROM task_item_links WHERE task_id = ?1",
        [task_id],
        |row| row.get(0),
    )?;
    Ok(max + 1)
}

fn pending_ids(conn: &Connection, task_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT item_id FROM task_item_links
         WHERE task_id = ?1 AND sequence IS NOT NULL
         ORDER BY sequence",
    )?;
    let ids = stmt
        .query_map([task_id], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn linked_tasks(conn: &Connection, item_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT task_id FROM task_item_links WHERE item_id = ?1")?;
    let ids = stmt
        .query_map([item_id], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn renumber(conn: &Connection, task_id: i64, ids: &[i64]) -> DbResult<()> {
    write_sequences(ids, |sequence, item_id| {
        conn.execute(
            "UPDATE task_item_links SET sequence = ?1 WHERE task_id = ?2 AND item_id = ?3",
            params![sequence, task_id, item_id],
        )
    })
}

fn compact(conn: &Connection, task_id: i64) -> DbResult<()> {
    let ids = pending_ids(conn, task_id)?;
    renumber(conn, task_id, &ids)
}

fn ensure_task(conn: &Connection, task_id: i64) -> DbResult<()> {
    let exists = conn
        .query_row("SELECT 1 FROM tasks WHERE id = ?1", [task_id], |_| Ok(()))
        .optional()?;
    exists.ok_or_else(|| DbError::NotFound(format!("Task: {}", task_id)))
}

/// Create an item and append it to a task's pending list. Returns its ID.
pub fn create_task_item(pool: &DbPool, task_id: i64, content: &str) -> DbResult<i64> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        ensure_task(&tx, task_id)?;

        tx.execute("INSERT INTO task_items (content) VALUES (?1)", [content])?;
        let item_id = tx.last_insert_rowid();
        let sequence = next_sequence(&tx, task_id)?;
        tx.execute(
            "INSERT INTO task_item_links (task_id, item_id, sequence) VALUES (?1, ?2, ?3)",
            params![task_id, item_id, sequence],
        )?;

        tx.commit()?;
        Ok(item_id)
    })
}

/// Attach an existing item to a task, moving it to the end if it is already
/// attached. Returns the item's sequence in that task (None when the item is
/// not pending).
pub fn link_task_item(pool: &DbPool, task_id: i64, item_id: i64) -> DbResult<Option<i64>> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        ensure_task(&tx, task_id)?;

        let status: i64 = tx
            .query_row("SELECT status FROM task_items WHERE id = ?1", [item_id], |row| row.get(0))
            .map_err(item_not_found(item_id))?;

        let sequence = if status == STATUS_PENDING {
            Some(next_sequence(&tx, task_id)?)
        } else {
            None
        };

        tx.execute(
            "INSERT INTO task_item_links (task_id, item_id, sequence)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(task_id, item_id)
             DO UPDATE SET sequence = excluded.sequence",
            params![task_id, item_id, sequence],
        )?;
        compact(&tx, task_id)?;

        let sequence = tx.query_row(
            "SELECT sequence FROM task_item_links WHERE task_id = ?1 AND item_id = ?2",
            params![task_id, item_id],
            |row| row.get(0),
        )?;

        tx.commit()?;
        debug!(task_id, item_id, ?sequence, "Task item linked");
        Ok(sequence)
    })
}

/// Get a task item by ID.
pub fn get_task_item(pool: &DbPool, id: i64) -> DbResult<TaskItemRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT id, content, status FROM task_items WHERE id = ?1",
            [id],
            |row| {
                Ok(TaskItemRow {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    status: row.get(2)?,
                })
            },
        )
        .map_err(item_not_found(id))
    })
}

/// List a task's items: pending ones in order, then finished ones.
pub fn list_task_items(pool: &DbPool, task_id: i64) -> DbResult<Vec<LinkedTaskItemRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT task_items.id, task_items.content, task_items.status, task_item_links.sequence
             FROM task_items
             JOIN task_item_links ON task_items.id = task_item_links.item_id
             WHERE task_item_links.task_id = ?1
             ORDER BY task_item_links.sequence IS NULL, task_item_links.sequence, task_items.id",
        )?;

        let rows = stmt.query_map([task_id], |row| {
            Ok(LinkedTaskItemRow {
                id: row.get(0)?,
                content: row.get(1)?,
                status: row.get(2)?,
                sequence: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Update an item's content and status.
///
/// An item that stops being pending loses its position in every task it is
/// linked to and the remaining pending items close ranks. An item that
/// becomes pending again is appended to the end of those tasks.
pub fn update_task_item(pool: &DbPool, id: i64, content: &str, status: i64) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let previous: i64 = tx
            .query_row("SELECT status FROM task_items WHERE id = ?1", [id], |row| row.get(0))
            .map_err(item_not_found(id))?;

        tx.execute(
            "UPDATE task_items SET content = ?1, status = ?2 WHERE id = ?3",
            params![content, status, id],
        )?;

        let tasks = linked_tasks(&tx, id)?;
        if status != STATUS_PENDING {
            tx.execute(
                "UPDATE task_item_links SET sequence = NULL WHERE item_id = ?1",
                [id],
            )?;
            for task_id in &tasks {
                compact(&tx, *task_id)?;
            }
        } else if previous != STATUS_PENDING {
            for task_id in &tasks {
                let sequence = next_sequence(&tx, *task_id)?;
                tx.execute(
                    "UPDATE task_item_links SET sequence = ?1 WHERE task_id = ?2 AND item_id = ?3",
                    params![sequence, task_id, id],
                )?;
            }
        }

        tx.commit()?;
        debug!(item_id = id, previous, status, "Task item updated");
        Ok(())
    })
}

/// Move a pending item to a 1-based position within a task.
pub fn update_task_item_sequence(
    pool: &DbPool,
    task_id: i64,
    item_id: i64,
    new_sequence: i64,
) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let mut ids = pending_ids(&tx, task_id)?;
        move_to(&mut ids, item_id, new_sequence, "Pending task item")?;
        renumber(&tx, task_id, &ids)?;

        tx.commit()?;
        Ok(())
    })
}

/// Delete an item from every task it is linked to.
pub fn delete_task_item(pool: &DbPool, id: i64) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let tasks = linked_tasks(&tx, id)?;
        let deleted = tx.execute("DELETE FROM task_items WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(DbError::NotFound(format!("Task item: {}", id)));
        }
        for task_id in tasks {
            compact(&tx, task_id)?;
        }

        tx.commit()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::queries::{projects, tasks};

    const COMPLETED: i64 = 1;

    fn setup() -> (DbPool, i64) {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        let project = projects::create_project(&pool, "Inbox", None).unwrap();
        let task = tasks::create_task(&pool, project, "Groceries", None).unwrap();
        (pool, task)
    }

    fn listing(pool: &DbPool, task_id: i64) -> Vec<(String, Option<i64>)> {
        list_task_items(pool, task_id)
            .unwrap()
            .into_iter()
            .map(|i| (i.content, i.sequence))
            .collect()
    }

    #[test]
    fn test_create_appends_to_task() {
        let (pool, task) = setup();
        create_task_item(&pool, task, "milk").unwrap();
        create_task_item(&pool, task, "eggs").unwrap();

        assert_eq!(
            listing(&pool, task),
            vec![("milk".into(), Some(1)), ("eggs".into(), Some(2))]
        );
    }

    #[test]
    fn test_create_for_missing_task() {
        let (pool, _) = setup();
        assert!(matches!(create_task_item(&pool, 404, "x"), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_completing_item_compacts_pending() {
        let (pool, task) = setup();
        let milk = create_task_item(&pool, task, "milk").unwrap();
        create_task_item(&pool, task, "eggs").unwrap();
        create_task_item(&pool, task, "bread").unwrap();

        update_task_item(&pool, milk, "milk", COMPLETED).unwrap();

        assert_eq!(
            listing(&pool, task),
            vec![
                ("eggs".into(), Some(1)),
                ("bread".into(), Some(2)),
                ("milk".into(), None),
            ]
        );
        assert_eq!(get_task_item(&pool, milk).unwrap().status, COMPLETED);
    }

    #[test]
    fn test_reopening_item_appends() {
        let (pool, task) = setup();
        let milk = create_task_item(&pool, task, "milk").unwrap();
        create_task_item(&pool, task, "eggs").unwrap();

        update_task_item(&pool, milk, "milk", COMPLETED).unwrap();
        update_task_item(&pool, milk, "oat milk", STATUS_PENDING).unwrap();

        assert_eq!(
            listing(&pool, task),
            vec![("eggs".into(), Some(1)), ("oat milk".into(), Some(2))]
        );
    }

    #[test]
    fn test_shared_item_across_tasks() {
        let (pool, task) = setup();
        let project = tasks::get_task(&pool, task).unwrap().project_id;
        let other = tasks::create_task(&pool, project, "Party", None).unwrap();

        let chips = create_task_item(&pool, task, "chips").unwrap();
        create_task_item(&pool, other, "balloons").unwrap();
        assert_eq!(link_task_item(&pool, other, chips).unwrap(), Some(2));

        update_task_item(&pool, chips, "chips", COMPLETED).unwrap();
        assert_eq!(listing(&pool, other)[1], ("chips".into(), None));

        delete_task_item(&pool, chips).unwrap();
        assert!(listing(&pool, task).is_empty());
        assert_eq!(listing(&pool, other), vec![("balloons".into(), Some(1))]);
    }

    #[test]
    fn test_relinking_moves_to_end() {
        let (pool, task) = setup();
        let milk = create_task_item(&pool, task, "milk").unwrap();
        create_task_item(&pool, task, "eggs").unwrap();

        assert_eq!(link_task_item(&pool, task, milk).unwrap(), Some(2));
        assert_eq!(
            listing(&pool, task),
            vec![("eggs".into(), Some(1)), ("milk".into(), Some(2))]
        );
    }

    #[test]
    fn test_reorder_pending_items() {
        let (pool, task) = setup();
        create_task_item(&pool, task, "a").unwrap();
        create_task_item(&pool, task, "b").unwrap();
        let c = create_task_item(&pool, task, "c").unwrap();

        update_task_item_sequence(&pool, task, c, 1).unwrap();
        assert_eq!(
            listing(&pool, task),
            vec![("c".into(), Some(1)), ("a".into(), Some(2)), ("b".into(), Some(3))]
        );

        assert!(matches!(
            update_task_item_sequence(&pool, task, c, 0),
            Err(DbError::InvalidSequence { .. })
        ));
    }

    #[test]
    fn test_finished_item_cannot_be_reordered() {
        let (pool, task) = setup();
        let a = create_task_item(&pool, task, "a").unwrap();
        update_task_item(&pool, a, "a", COMPLETED).unwrap();

        assert!(matches!(
            update_task_item_sequence(&pool, task, a, 1),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_deleting_task_drops_links_but_keeps_items() {
        let (pool, task) = setup();
        let milk = create_task_item(&pool, task, "milk").unwrap();

        tasks::delete_task(&pool, task).unwrap();
        assert!(list_task_items(&pool, task).unwrap().is_empty());
        assert_eq!(get_task_item(&pool, milk).unwrap().content, "milk");
    }
}
