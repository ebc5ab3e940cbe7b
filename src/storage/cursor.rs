//! Row cursors
//!
//! One generic cursor drives every per-entity iteration. It holds a
//! `BorrowedStatement` and keeps exactly one decoded row of lookahead:
//!
//! ```text
//! EMPTY --reinit(slot)--> ACTIVE | AT_END
//! ACTIVE --next()-------> ACTIVE | AT_END
//! any   --destroy()-----> EMPTY (at end)
//! ```
//!
//! An engine error while fetching destroys the cursor at once, so a failed
//! cursor never keeps its statement lent out. The row already handed out is
//! kept; the error is reported by the following `next()`.

use std::marker::PhantomData;

use rusqlite::Row;

use super::lending::BorrowedStatement;
use crate::{Error, Result};

/// Column layout of one kind of result row.
///
/// `COLUMNS` is the select list the issuing query must start with; `decode`
/// reads the columns by position in that order.
pub trait RowLayout {
    type Record;

    const COLUMNS: &'static str;

    fn decode(row: &Row<'_>) -> rusqlite::Result<Self::Record>;
}

/// One-row-lookahead iterator over the rows of a lent statement.
pub struct RowCursor<'r, 'conn, L: RowLayout> {
    slot: BorrowedStatement<'r, 'conn>,
    lookahead: Option<L::Record>,
    /// Fetch failure not yet reported to the caller
    failure: Option<Error>,
    _layout: PhantomData<L>,
}

impl<'r, 'conn, L: RowLayout> RowCursor<'r, 'conn, L> {
    /// A cursor without statement; `has_next()` is false
    pub fn init_empty() -> Self {
        Self {
            slot: BorrowedStatement::init_void(),
            lookahead: None,
            failure: None,
            _layout: PhantomData,
        }
    }

    /// Adopt `slot` and fetch the first row
    pub fn new(slot: BorrowedStatement<'r, 'conn>) -> Result<Self> {
        let mut cursor = Self::init_empty();
        cursor.reinit(slot)?;
        Ok(cursor)
    }

    /// Release any previous slot, adopt `slot` and fetch its first row.
    pub fn reinit(&mut self, slot: BorrowedStatement<'r, 'conn>) -> Result<()> {
        if !slot.is_valid() {
            self.destroy();
            return Err(Error::InvalidRequest("cursor requires a valid statement".to_string()));
        }
        self.destroy();
        self.slot = slot;
        self.fetch()
    }

    /// Release the slot and force the cursor to its end. Idempotent.
    pub fn destroy(&mut self) {
        self.lookahead = None;
        self.failure = None;
        self.slot.destroy();
    }

    /// True while a row or an unreported fetch failure is pending
    pub fn has_next(&self) -> bool {
        self.lookahead.is_some() || self.failure.is_some()
    }

    /// Return the buffered row and fetch the one after it.
    ///
    /// If fetching the following row fails, the cursor is destroyed and the
    /// row is still returned; the next call then fails with `AtDb`. Past the
    /// end it fails with `InvalidRequest`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<L::Record> {
        if let Some(record) = self.lookahead.take() {
            if let Err(err) = self.fetch() {
                self.failure = Some(err);
            }
            return Ok(record);
        }
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.destroy();
        Err(Error::InvalidRequest("cursor is at its end".to_string()))
    }

    /// Drain at most `max` buffered records.
    ///
    /// A pending fetch failure is returned only when no record precedes it.
    pub fn next_batch(&mut self, max: usize) -> Result<Vec<L::Record>> {
        if self.lookahead.is_none() {
            if let Some(err) = self.failure.take() {
                return Err(err);
            }
        }
        let mut records = Vec::new();
        while records.len() < max && self.lookahead.is_some() {
            records.push(self.next()?);
        }
        Ok(records)
    }

    /// Name of the statement backing this cursor
    pub fn statement_name(&self) -> Option<&'static str> {
        self.slot.name()
    }

    fn fetch(&mut self) -> Result<()> {
        let fetched = match self.slot.step() {
            Ok(Some(row)) => Some(L::decode(row).map_err(Error::from)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        };

        match fetched {
            Some(Ok(record)) => {
                self.lookahead = Some(record);
                Ok(())
            }
            None => {
                self.lookahead = None;
                Ok(())
            }
            Some(Err(err)) => {
                tracing::debug!(
                    "Cursor over '{}' failed, releasing statement: {}",
                    self.slot.name().unwrap_or("void"),
                    err
                );
                self.destroy();
                Err(err)
            }
        }
    }
}

impl<L: RowLayout> Default for RowCursor<'_, '_, L> {
    fn default() -> Self {
        Self::init_empty()
    }
}

impl<L: RowLayout> std::fmt::Debug for RowCursor<'_, '_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowCursor")
            .field("slot", &self.slot)
            .field("has_next", &self.has_next())
            .finish()
    }
}
