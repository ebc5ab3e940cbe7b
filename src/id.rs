//! Row and entity identifiers
//!
//! Format of an entity id: `<table-prefix><row-id>`, zero-padded to four digits.
//!
//! Examples:
//! - `C0042` - classifier row 42
//! - `D0007` - diagram row 7
//! - `E12345` - diagram element row 12345

use crate::{Error, Result};
use rusqlite::types::{FromSql, FromSqlResult, Null, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one row within one table.
///
/// `RowId::VOID` means "no row" and is what NULL foreign keys decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub i64);

impl RowId {
    pub const VOID: RowId = RowId(-1);

    pub fn is_void(self) -> bool {
        self == RowId::VOID
    }

    /// Map a nullable column value, NULL becomes `VOID`
    pub fn from_nullable(value: Option<i64>) -> Self {
        value.map_or(RowId::VOID, RowId)
    }

    /// Inverse of `from_nullable`: `VOID` is bound as SQL NULL
    pub fn to_nullable(self) -> Option<i64> {
        if self.is_void() { None } else { Some(self.0) }
    }
}

impl Default for RowId {
    fn default() -> Self {
        RowId::VOID
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        RowId(value)
    }
}

impl FromSql for RowId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(RowId::VOID),
            other => i64::column_result(other).map(RowId),
        }
    }
}

impl ToSql for RowId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.to_nullable() {
            Some(value) => ToSqlOutput::from(value),
            None => ToSqlOutput::from(Null),
        })
    }
}

/// The table a row id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Classifier,
    Feature,
    Relationship,
    Diagram,
    DiagramElement,
}

impl TableKind {
    /// Single-letter prefix used in the textual entity id
    pub fn prefix(&self) -> char {
        match self {
            TableKind::Classifier => 'C',
            TableKind::Feature => 'F',
            TableKind::Relationship => 'R',
            TableKind::Diagram => 'D',
            TableKind::DiagramElement => 'E',
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(TableKind::Classifier),
            'F' => Some(TableKind::Feature),
            'R' => Some(TableKind::Relationship),
            'D' => Some(TableKind::Diagram),
            'E' => Some(TableKind::DiagramElement),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Classifier => "classifier",
            TableKind::Feature => "feature",
            TableKind::Relationship => "relationship",
            TableKind::Diagram => "diagram",
            TableKind::DiagramElement => "diagram_element",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row id tagged with its table, so ids of different tables never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub table: TableKind,
    pub row_id: RowId,
}

impl EntityId {
    pub fn new(table: TableKind, row_id: impl Into<RowId>) -> Self {
        Self { table, row_id: row_id.into() }
    }

    pub fn void(table: TableKind) -> Self {
        Self { table, row_id: RowId::VOID }
    }

    pub fn is_void(&self) -> bool {
        self.row_id.is_void()
    }

    /// Parse the textual form, e.g. `C0042`
    pub fn parse(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let prefix = chars
            .next()
            .ok_or_else(|| Error::Parse("empty id".to_string()))?;
        let table = TableKind::from_prefix(prefix)
            .ok_or_else(|| Error::Parse(format!("unknown table prefix '{}' in {}", prefix, s)))?;

        let digits = chars.as_str();
        let row: i64 = digits
            .parse()
            .map_err(|_| Error::Parse(format!("invalid row number: {}", digits)))?;
        if row < 0 {
            return Err(Error::Parse(format!("negative row number: {}", s)));
        }

        Ok(Self::new(table, row))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_void() {
            write!(f, "{}void", self.table.prefix())
        } else {
            write!(f, "{}{:04}", self.table.prefix(), self.row_id.0)
        }
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EntityId::parse(&s).map_err(serde::de::Error::custom)
    }
}
