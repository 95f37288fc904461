//! Project-related database queries.

use super::{move_to, write_sequences};
use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::{params, Connection};
use tracing::debug;

/// Project row from database.
#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub sequence: i64,
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectRow> {
    Ok(ProjectRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        sequence: row.get(3)?,
    })
}

fn ordered_ids(conn: &Connection) -> DbResult<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM projects ORDER BY sequence")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn renumber(conn: &Connection, ids: &[i64]) -> DbResult<()> {
    write_sequences(ids, |sequence, id| {
        conn.execute(
            "UPDATE projects SET sequence = ?1 WHERE id = ?2",
            params![sequence, id],
        )
    })
}

/// Create a new project at the end of the list. Returns its ID.
pub fn create_project(pool: &DbPool, title: &str, description: Option<&str>) -> DbResult<i64> {
    pool.with_conn(|conn| {
        let max_sequence: i64 = conn.query_row(
            "SELECT COALESCE(MAX(sequence), 0) FROM projects",
            [],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO projects (title, description, sequence) VALUES (?1, ?2, ?3)",
            params![title, description, max_sequence + 1],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get a project by ID.
pub fn get_project(pool: &DbPool, id: i64) -> DbResult<ProjectRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT id, title, description, sequence FROM projects WHERE id = ?1",
            params![id],
            map_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Project: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// List all projects in display order.
pub fn list_projects(pool: &DbPool) -> DbResult<Vec<ProjectRow>> {
    pool.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT id, title, description, sequence FROM projects ORDER BY sequence")?;
        let rows = stmt.query_map([], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Update a project's title and description.
pub fn update_project_content(
    pool: &DbPool,
    id: i64,
    title: &str,
    description: Option<&str>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE projects SET title = ?1, description = ?2 WHERE id = ?3",
            params![title, description, id],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(format!("Project: {}", id)));
        }
        Ok(())
    })
}

/// Move a project to a 1-based position, shifting the others.
pub fn update_project_sequence(pool: &DbPool, id: i64, new_sequence: i64) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let mut ids = ordered_ids(&tx)?;
        move_to(&mut ids, id, new_sequence, "Project")?;
        renumber(&tx, &ids)?;

        tx.commit()?;
        debug!(project_id = id, sequence = new_sequence, "Project moved");
        Ok(())
    })
}

/// Delete a project and its tasks, closing the gap in the sequence.
pub fn delete_project(pool: &DbPool, id: i64) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let deleted = tx.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DbError::NotFound(format!("Project: {}", id)));
        }
        let ids = ordered_ids(&tx)?;
        renumber(&tx, &ids)?;

        tx.commit()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        pool
    }

    fn titles(pool: &DbPool) -> Vec<(String, i64)> {
        list_projects(pool)
            .unwrap()
            .into_iter()
            .map(|p| (p.title, p.sequence))
            .collect()
    }

    #[test]
    fn test_create_appends() {
        let pool = pool();
        create_project(&pool, "Home", None).unwrap();
        let id = create_project(&pool, "Work", Some("Day job")).unwrap();

        let project = get_project(&pool, id).unwrap();
        assert_eq!(project.sequence, 2);
        assert_eq!(project.description.as_deref(), Some("Day job"));
    }

    #[test]
    fn test_get_missing_project() {
        let pool = pool();
        assert!(matches!(get_project(&pool, 42), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_move_project_up_and_down() {
        let pool = pool();
        let a = create_project(&pool, "A", None).unwrap();
        create_project(&pool, "B", None).unwrap();
        let c = create_project(&pool, "C", None).unwrap();

        update_project_sequence(&pool, c, 1).unwrap();
        assert_eq!(
            titles(&pool),
            vec![("C".into(), 1), ("A".into(), 2), ("B".into(), 3)]
        );

        update_project_sequence(&pool, a, 3).unwrap();
        assert_eq!(
            titles(&pool),
            vec![("C".into(), 1), ("B".into(), 2), ("A".into(), 3)]
        );
    }

    #[test]
    fn test_move_project_out_of_range_keeps_order() {
        let pool = pool();
        let a = create_project(&pool, "A", None).unwrap();
        create_project(&pool, "B", None).unwrap();

        assert!(matches!(
            update_project_sequence(&pool, a, 5),
            Err(DbError::InvalidSequence { .. })
        ));
        assert_eq!(titles(&pool), vec![("A".into(), 1), ("B".into(), 2)]);
    }

    #[test]
    fn test_update_content() {
        let pool = pool();
        let id = create_project(&pool, "Draft", None).unwrap();
        update_project_content(&pool, id, "Final", Some("done")).unwrap();

        let project = get_project(&pool, id).unwrap();
        assert_eq!(project.title, "Final");
        assert_eq!(project.description.as_deref(), Some("done"));

        assert!(matches!(
            update_project_content(&pool, 99, "x", None),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_closes_gap() {
        let pool = pool();
        create_project(&pool, "A", None).unwrap();
        let b = create_project(&pool, "B", None).unwrap();
        create_project(&pool, "C", None).unwrap();

        delete_project(&pool, b).unwrap();
        assert_eq!(titles(&pool), vec![("A".into(), 1), ("C".into(), 2)]);

        let d = create_project(&pool, "D", None).unwrap();
        assert_eq!(get_project(&pool, d).unwrap().sequence, 3);
    }
}
