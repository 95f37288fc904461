//! Task-related database queries.

use super::{move_to, write_sequences};
use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::{params, Connection};
use tracing::debug;

/// Task row from database.
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub sequence: i64,
}

const SELECT_TASK: &str = "SELECT id, project_id, title, description, sequence FROM tasks";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        sequence: row.get(4)?,
    })
}

fn not_found(id: i64) -> impl FnOnce(rusqlite::Error) -> DbError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Task: {}", id)),
        e => DbError::Connection(e),
    }
}

fn ordered_ids(conn: &Connection, project_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM tasks WHERE project_id = ?1 ORDER BY sequence")?;
    let ids = stmt
        .query_map([project_id], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn renumber(conn: &Connection, ids: &[i64]) -> DbResult<()> {
    write_sequences(ids, |sequence, id| {
        conn.execute(
            "UPDATE tasks SET sequence = ?1 WHERE id = ?2",
            params![sequence, id],
        )
    })
}

/// Create a task at the end of a project's list. Returns its ID.
pub fn create_task(
    pool: &DbPool,
    project_id: i64,
    title: &str,
    description: Option<&str>,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        let max_sequence: i64 = conn.query_row(
            "SELECT COALESCE(MAX(sequence), 0) FROM tasks WHERE project_id = ?1",
            [project_id],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO tasks (project_id, title, description, sequence) VALUES (?1, ?2, ?3, ?4)",
            params![project_id, title, description, max_sequence + 1],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a task by ID.
pub fn get_task(pool: &DbPool, id: i64) -> DbResult<TaskRow> {
    pool.with_conn(|conn| {
        conn.query_row(&format!("{} WHERE id = ?1", SELECT_TASK), [id], map_row)
            .map_err(not_found(id))
    })
}

/// List a project's tasks in display order.
pub fn list_tasks(pool: &DbPool, project_id: i64) -> DbResult<Vec<TaskRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE project_id = ?1 ORDER BY sequence",
            SELECT_TASK
        ))?;
        let rows = stmt.query_map([project_id], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Update a task's title and description.
pub fn update_task_content(
    pool: &DbPool,
    id: i64,
    title: &str,
    description: Option<&str>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2 WHERE id = ?3",
            params![title, description, id],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(format!("Task: {}", id)));
        }
        Ok(())
    })
}

/// Move a task to a 1-based position within its project.
pub fn update_task_sequence(pool: &DbPool, id: i64, new_sequence: i64) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let project_id: i64 = tx
            .query_row("SELECT project_id FROM tasks WHERE id = ?1", [id], |row| row.get(0))
            .map_err(not_found(id))?;

        let mut ids = ordered_ids(&tx, project_id)?;
        move_to(&mut ids, id, new_sequence, "Task")?;
        renumber(&tx, &ids)?;

        tx.commit()?;
        debug!(task_id = id, project_id, sequence = new_sequence, "Task moved");
        Ok(())
    })
}

/// Delete a task, closing the gap in its project's sequence.
pub fn delete_task(pool: &DbPool, id: i64) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let project_id: i64 = tx
            .query_row("SELECT project_id FROM tasks WHERE id = ?1", [id], |row| row.get(0))
            .map_err(not_found(id))?;

        tx.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        let ids = ordered_ids(&tx, project_id)?;
        renumber(&tx, &ids)?;

        tx.commit()?;
        Ok(())
    })
}
