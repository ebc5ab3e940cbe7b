//! Lending slot over a reader-owned statement
//!
//! `BorrowedStatement` is the only way to execute a statement held in a
//! `StatementHome`. Creating one fails with `WrongState` while another slot
//! over the same home is alive; dropping or destroying it hands the statement
//! back, even if stepping failed before.

use rusqlite::types::ToSql;
use rusqlite::{Connection, Row, Rows, Statement};

use super::statement::{Lease, StatementHome};
use crate::{Error, Result};

enum Plan<'r, 'conn> {
    /// Lent out, parameters may be bound, not yet executing
    Bound(&'r mut Statement<'conn>),
    /// Executing; the statement is reset when the rows are dropped
    Stepping(Rows<'r>),
    Void,
}

/// Exclusive, revocable access to one prepared statement.
pub struct BorrowedStatement<'r, 'conn> {
    plan: Plan<'r, 'conn>,
    lease: Option<Lease<'r, 'conn>>,
    conn: Option<&'conn Connection>,
}

impl<'r, 'conn> BorrowedStatement<'r, 'conn> {
    /// An inert slot that is never backed by a statement
    pub fn init_void() -> Self {
        Self {
            plan: Plan::Void,
            lease: None,
            conn: None,
        }
    }

    /// Borrow the statement of `home`; fails with `WrongState` if it is already lent out
    pub fn init(conn: &'conn Connection, home: &'r StatementHome<'conn>) -> Result<Self> {
        let (lease, stmt) = home.lend()?;
        Ok(Self {
            plan: Plan::Bound(stmt),
            lease: Some(lease),
            conn: Some(conn),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.lease.is_some()
    }

    /// Name of the borrowed statement, `None` for a void slot
    pub fn name(&self) -> Option<&'static str> {
        self.lease.as_ref().map(|lease| lease.home().name())
    }

    pub fn get_database(&self) -> Option<&'conn Connection> {
        self.conn
    }

    /// The borrowed statement. Must not be called on a void slot.
    pub fn get_statement(&self) -> Option<&Statement<'_>> {
        debug_assert!(self.is_valid(), "get_statement on a void slot");
        match &self.plan {
            Plan::Bound(stmt) => Some(&**stmt),
            Plan::Stepping(rows) => rows.as_ref(),
            Plan::Void => None,
        }
    }

    /// Bind a positional (1-based) parameter before the first `step`
    pub fn bind<T: ToSql>(&mut self, index: usize, value: T) -> Result<()> {
        match &mut self.plan {
            Plan::Bound(stmt) => {
                stmt.raw_bind_parameter(index, value)?;
                Ok(())
            }
            Plan::Stepping(_) => Err(Error::InvalidRequest(
                "cannot bind parameters while stepping".to_string(),
            )),
            Plan::Void => Err(Error::InvalidRequest("bind on a void slot".to_string())),
        }
    }

    /// Advance by one row. `Ok(None)` once the result set is exhausted.
    pub fn step(&mut self) -> Result<Option<&Row<'r>>> {
        if let Plan::Bound(_) = self.plan {
            if let Plan::Bound(stmt) = std::mem::replace(&mut self.plan, Plan::Void) {
                self.plan = Plan::Stepping(stmt.raw_query());
            }
        }

        match &mut self.plan {
            Plan::Stepping(rows) => Ok(rows.next()?),
            Plan::Bound(_) | Plan::Void => {
                Err(Error::InvalidRequest("step on a void slot".to_string()))
            }
        }
    }

    /// Give the statement back to its home. Idempotent.
    ///
    /// The connection is borrowed for `'conn`, so it cannot be closed
    /// underneath the statement and releasing never fails.
    pub fn destroy(&mut self) {
        // dropping executing rows resets the statement
        self.plan = Plan::Void;
        self.lease = None;
        self.conn = None;
    }
}

impl Drop for BorrowedStatement<'_, '_> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl Default for BorrowedStatement<'_, '_> {
    fn default() -> Self {
        Self::init_void()
    }
}

impl std::fmt::Debug for BorrowedStatement<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plan = match self.plan {
            Plan::Bound(_) => "bound",
            Plan::Stepping(_) => "stepping",
            Plan::Void => "void",
        };
        f.debug_struct("BorrowedStatement")
            .field("name", &self.name())
            .field("plan", &plan)
            .finish()
    }
}
