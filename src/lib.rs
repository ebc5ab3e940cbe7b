//! # umlstore - read side of a UML/SysML model database
//!
//! Classifiers, features, relationships, diagrams and diagram elements are
//! persisted in SQLite. This crate provides:
//! - Lending of prepared statements with exactly one borrower at a time
//! - One-row-lookahead row cursors decoding into typed records
//! - Classifier and diagram readers with point lookups and cursor queries
//! - A cross-entity text search merging four cursors into one hit stream

#[macro_use]
mod kind;

pub mod id;
pub mod classifier;
pub mod feature;
pub mod relationship;
pub mod diagram;
pub mod rules;
pub mod storage;
pub mod search;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use id::{EntityId, RowId, TableKind};
pub use classifier::{Classifier, ClassifierType};
pub use feature::{Feature, FeatureType};
pub use relationship::{Relationship, RelationshipType};
pub use diagram::{Diagram, DiagramElement, DiagramType};
pub use rules::{DataRules, VisibilityRules};
pub use storage::{ClassifierReader, Database, DiagramReader};
pub use search::{SearchHit, SearchResultIterator, TextSearch};

/// Result type alias for umlstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for umlstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Expected absence, e.g. a lookup by uuid or name found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// The stored graph violates an invariant (dangling id, duplicate row)
    #[error("Database structure error: {0}")]
    DbStructure(String),

    /// The storage engine reported an error
    #[error("Storage error: {0}")]
    AtDb(#[from] rusqlite::Error),

    /// The caller violated the cursor protocol
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A statement was borrowed while already lent out, or a reader was closed too early
    #[error("Wrong state: {0}")]
    WrongState(String),

    /// A bounded output received more rows than it can hold; the first `capacity` rows were kept
    #[error("Result exceeds buffer of {capacity} entries")]
    ArrayBufferExceeded { capacity: usize },

    /// One or more statements of a reader failed to prepare
    #[error("Failed to prepare {} statement(s): {failures}", failures.len())]
    Prepare { failures: storage::PrepareFailures },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True for the engine-level failure class
    pub fn is_at_db(&self) -> bool {
        matches!(self, Error::AtDb(_))
    }

    /// True for failures that indicate a caller bug rather than a data problem
    pub fn is_programming_error(&self) -> bool {
        matches!(self, Error::InvalidRequest(_) | Error::WrongState(_))
    }
}
