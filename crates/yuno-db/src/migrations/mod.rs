//! Schema migrations, applied in order and tracked in `PRAGMA user_version`.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite_migration::{Migrations, M};

// Append new steps; never edit one that has shipped.
const STEPS: &[M<'static>] = &[M::up(include_str!("schema.sql"))];
fn migrations() -> Migrations<'static> {
    Migrations::new(STEPS.to_vec())
}

/// Bring the database up to the latest schema.
pub fn run_migrations(pool: &DbPool) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        migrations()
            .to_latest(conn)
            .map_err(|e| DbError::Migration(e.to_string()))
    })
}

/// Schema version recorded in the database (0 before the first migration).
pub fn schema_version(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| {
        let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_validate() {
        migrations().validate().unwrap();
    }

    #[test]
    fn test_creates_all_tables() {
        let pool = DbPool::in_memory().unwrap();
        assert_eq!(schema_version(&pool).unwrap(), 0);
        run_migrations(&pool).unwrap();

        let tables: Vec<String> = pool
            .with_conn(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                     ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .unwrap();

        assert_eq!(tables, ["projects", "task_item_links", "task_items", "tasks"]);
        assert_eq!(schema_version(&pool).unwrap(), 1);
    }

    #[test]
    fn test_rerun_is_noop() {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();
        assert_eq!(schema_version(&pool).unwrap(), 1);
    }
}
