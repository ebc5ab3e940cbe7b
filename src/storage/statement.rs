//! Prepared statements owned by a reader
//!
//! A reader prepares every statement once when it opens and keeps each one in
//! a `StatementHome` until it closes. The home also owns the "borrowed" flag
//! that `BorrowedStatement` sets while it holds the statement, which lets the
//! reader check at close time that nothing is still lent out.

use std::cell::{Cell, UnsafeCell};
use std::fmt;

use rusqlite::{Connection, Statement};
use crate::{Error, Result};

/// Home of one prepared statement.
///
/// Not `Sync`: a home is lent out from one thread of control only.
pub struct StatementHome<'conn> {
    name: &'static str,
    /// A `RefCell` cannot hold this: the lending slot keeps `Rows` that borrow
    /// the statement, and a `RefMut` cannot live in the same struct as a
    /// borrow of itself. Access is gated by `borrowed` and `Lease` instead.
    stmt: UnsafeCell<Option<Statement<'conn>>>,
    borrowed: Cell<bool>,
    finalized: Cell<bool>,
}

impl<'conn> StatementHome<'conn> {
    fn prepared(name: &'static str, stmt: Statement<'conn>) -> Self {
        Self {
            name,
            stmt: UnsafeCell::new(Some(stmt)),
            borrowed: Cell::new(false),
            finalized: Cell::new(false),
        }
    }

    /// A home whose preparation failed; it can never be lent out
    fn failed(name: &'static str) -> Self {
        Self {
            name,
            stmt: UnsafeCell::new(None),
            borrowed: Cell::new(false),
            finalized: Cell::new(true),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True while a `BorrowedStatement` holds this statement
    pub fn is_borrowed(&self) -> bool {
        self.borrowed.get()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.get()
    }

    /// Mark the statement as lent out and hand out exclusive access to it.
    ///
    /// The statement is handed back when the returned `Lease` is dropped.
    #[allow(clippy::mut_from_ref)]
    pub(super) fn lend<'r>(&'r self) -> Result<(Lease<'r, 'conn>, &'r mut Statement<'conn>)> {
        if self.borrowed.get() {
            return Err(Error::WrongState(format!(
                "statement '{}' is already borrowed",
                self.name
            )));
        }
        if self.finalized.get() {
            return Err(Error::WrongState(format!(
                "statement '{}' is finalized",
                self.name
            )));
        }

        // SAFETY: `borrowed` is false, so no other reference into `stmt`
        // exists. It is set below and cleared only when the `Lease` drops.
        // A `Lease` can only be built here, and its holder drops everything
        // derived from the returned reference first. `finalize` refuses to
        // touch `stmt` while `borrowed` is set, and the home is not `Sync`.
        let stmt = unsafe { &mut *self.stmt.get() };
        match stmt.as_mut() {
            Some(stmt) => {
                self.borrowed.set(true);
                Ok((Lease { home: self }, stmt))
            }
            None => Err(Error::WrongState(format!("statement '{}' is not prepared", self.name))),
        }
    }

    /// Finalize the statement; fails while it is lent out
    pub(crate) fn finalize(&self) -> Result<()> {
        if self.borrowed.get() {
            return Err(Error::WrongState(format!(
                "statement '{}' is still borrowed",
                self.name
            )));
        }
        if self.finalized.replace(true) {
            return Ok(());
        }

        // SAFETY: not borrowed, so no reference into `stmt` is alive.
        let stmt = unsafe { &mut *self.stmt.get() };
        drop(stmt.take());
        tracing::debug!("Finalized statement '{}'", self.name);
        Ok(())
    }
}

/// Proof that a statement is lent out. Dropping it hands the statement back.
pub(super) struct Lease<'r, 'conn> {
    home: &'r StatementHome<'conn>,
}

impl<'r, 'conn> Lease<'r, 'conn> {
    pub(super) fn home(&self) -> &'r StatementHome<'conn> {
        self.home
    }
}

impl Drop for Lease<'_, '_> {
    fn drop(&mut self) {
        self.home.borrowed.set(false);
    }
}

impl fmt::Debug for StatementHome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementHome")
            .field("name", &self.name)
            .field("borrowed", &self.borrowed.get())
            .field("finalized", &self.finalized.get())
            .finish()
    }
}

/// One statement that failed to prepare
#[derive(Debug)]
pub struct PrepareFailure {
    pub name: &'static str,
    pub source: rusqlite::Error,
}

/// Every preparation failure of one reader
#[derive(Debug, Default)]
pub struct PrepareFailures(pub Vec<PrepareFailure>);

impl PrepareFailures {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|f| f.name).collect()
    }
}

impl fmt::Display for PrepareFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|failure| format!("{}: {}", failure.name, failure.source))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Prepares all statements of a reader, collecting every failure instead of
/// stopping at the first one.
pub(crate) struct Preparer<'conn> {
    conn: &'conn Connection,
    failures: PrepareFailures,
    prepared: usize,
}

impl<'conn> Preparer<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            failures: PrepareFailures::default(),
            prepared: 0,
        }
    }

    pub fn prepare(&mut self, name: &'static str, sql: &str) -> StatementHome<'conn> {
        match self.conn.prepare(sql) {
            Ok(stmt) => {
                self.prepared += 1;
                StatementHome::prepared(name, stmt)
            }
            Err(source) => {
                tracing::debug!("Failed to prepare '{}': {}", name, source);
                self.failures.0.push(PrepareFailure { name, source });
                StatementHome::failed(name)
            }
        }
    }

    /// Succeeds only if every statement prepared
    pub fn finish(self, reader: &str) -> Result<()> {
        if self.failures.is_empty() {
            tracing::debug!("{}: prepared {} statements", reader, self.prepared);
            Ok(())
        } else {
            Err(Error::Prepare { failures: self.failures })
        }
    }
}

/// Finalize all homes of a reader; refuses if any of them is lent out.
pub(crate) fn finalize_all(reader: &str, homes: &[&StatementHome<'_>]) -> Result<()> {
    let borrowed: Vec<&str> = homes
        .iter()
        .filter(|home| home.is_borrowed())
        .map(|home| home.name())
        .collect();
    if !borrowed.is_empty() {
        tracing::error!("{} closed while statements are lent out: {:?}", reader, borrowed);
        return Err(Error::WrongState(format!(
            "{} still has borrowed statements: {}",
            reader,
            borrowed.join(", ")
        )));
    }

    for home in homes {
        home.finalize()?;
    }
    Ok(())
}
