//! Query helpers shared by the readers

use rusqlite::Connection;
use rusqlite::types::ToSql;

use super::cursor::{RowCursor, RowLayout};
use super::layout::RowIdLayout;
use super::lending::BorrowedStatement;
use super::statement::StatementHome;
use crate::id::RowId;
use crate::{Error, Result};

/// What an empty point lookup means to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Absence {
    /// Normal outcome, e.g. lookup by uuid or name
    Expected,
    /// The key is a foreign key that should exist
    Structural,
}

/// Run a point lookup that must produce exactly one row.
pub(crate) fn query_single<'conn, L, K>(
    conn: &'conn Connection,
    home: &StatementHome<'conn>,
    key: K,
    absence: Absence,
) -> Result<L::Record>
where
    L: RowLayout,
    K: ToSql + std::fmt::Display,
{
    let mut slot = BorrowedStatement::init(conn, home)?;
    slot.bind(1, &key)?;

    let record = match slot.step()? {
        Some(row) => L::decode(row)?,
        None => {
            return Err(match absence {
                Absence::Expected => Error::NotFound(format!("{}: {}", home.name(), key)),
                Absence::Structural => {
                    tracing::warn!("{}: referenced row {} does not exist", home.name(), key);
                    Error::DbStructure(format!("{}: no row for {}", home.name(), key))
                }
            });
        }
    };

    if slot.step()?.is_some() {
        tracing::warn!("{}: more than one row for {}", home.name(), key);
        return Err(Error::DbStructure(format!(
            "{}: more than one row for {}",
            home.name(),
            key
        )));
    }
    Ok(record)
}

/// Lend `home`, bind `key` as the only parameter and hand the slot to a new cursor.
pub(crate) fn query_cursor<'r, 'conn, L, K>(
    conn: &'conn Connection,
    home: &'r StatementHome<'conn>,
    key: K,
) -> Result<RowCursor<'r, 'conn, L>>
where
    L: RowLayout,
    K: ToSql,
{
    let slot = bound_slot(conn, home, key)?;
    RowCursor::new(slot)
}

/// Lend `home` with `key` bound to its only parameter
pub(crate) fn bound_slot<'r, 'conn, K: ToSql>(
    conn: &'conn Connection,
    home: &'r StatementHome<'conn>,
    key: K,
) -> Result<BorrowedStatement<'r, 'conn>> {
    let mut slot = BorrowedStatement::init(conn, home)?;
    slot.bind(1, key)?;
    Ok(slot)
}

/// Collect at most `max` ids into `out`.
///
/// If the query yields more, `out` keeps the first `max` and the call reports
/// `ArrayBufferExceeded`.
pub(crate) fn query_bounded_ids<'conn, K: ToSql>(
    conn: &'conn Connection,
    home: &StatementHome<'conn>,
    key: K,
    max: usize,
    out: &mut Vec<RowId>,
) -> Result<()> {
    out.clear();
    let mut slot = bound_slot(conn, home, key)?;
    while let Some(row) = slot.step()? {
        if out.len() == max {
            tracing::warn!("{}: more than {} rows, result truncated", home.name(), max);
            return Err(Error::ArrayBufferExceeded { capacity: max });
        }
        out.push(RowIdLayout::decode(row)?);
    }
    Ok(())
}
