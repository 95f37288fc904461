//! Database query implementations.

pub mod projects;
pub mod task_items;
pub mod tasks;

use crate::pool::{DbError, DbResult};

/// Move `id` to the 1-based position `new_sequence` within `ids`.
pub(crate) fn move_to(ids: &mut Vec<i64>, id: i64, new_sequence: i64, kind: &str) -> DbResult<()> {
    let index = ids
        .iter()
        .position(|candidate| *candidate == id)
        .ok_or_else(|| DbError::NotFound(format!("{}: {}", kind, id)))?;

    let max = ids.len() as i64;
    if new_sequence < 1 || new_sequence > max {
        return Err(DbError::InvalidSequence {
            sequence: new_sequence,
            max,
        });
    }

    let moved = ids.remove(index);
    ids.insert((new_sequence - 1) as usize, moved);
    Ok(())
}

/// Renumber `ids` to 1..=n in order.
///
/// Runs in two passes through negative temporaries so a UNIQUE sequence
/// column never sees a duplicate mid-update. Callers run this inside a
/// transaction.
pub(crate) fn write_sequences<F>(ids: &[i64], mut update: F) -> DbResult<()>
where
    F: FnMut(i64, i64) -> rusqlite::Result<usize>,
{
    for (index, id) in ids.iter().enumerate() {
        update(-(index as i64 + 1), *id)?;
    }
    for (index, id) in ids.iter().enumerate() {
        update(index as i64 + 1, *id)?;
    }
    Ok(())
}
