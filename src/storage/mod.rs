//! Storage Layer - read access to a SQLite model file
//!
//! System of record is SQLite with tables:
//! - classifiers(id, main_type, stereotype, name, description, x/y/list order, uuid)
//! - features(id, main_type, classifier_id, key, value, description, list_order, uuid)
//! - relationships(id, main_type, from/to classifier, from/to feature, name, ...)
//! - diagrams(id, parent_id, diagram_type, name, ...)
//! - diagramelements(id, diagram_id, classifier_id, display_flags, focused_feature_id, uuid)
//!
//! Readers prepare their statements once and lend them to cursors through
//! `BorrowedStatement`; at most one cursor per statement is alive at a time.

pub mod schema;
mod statement;
mod lending;
mod cursor;
mod layout;
mod reader;
mod classifier_reader;
mod diagram_reader;
mod database;

#[cfg(test)]
pub(crate) mod test_support;

pub use statement::{PrepareFailure, PrepareFailures, StatementHome};
pub use lending::BorrowedStatement;
pub use cursor::{RowCursor, RowLayout};
pub use layout::{
    ClassifierCursor, ClassifierLayout, DiagramCursor, DiagramElementCursor, DiagramElementLayout,
    DiagramLayout, FeatureCursor, FeatureLayout, RelationshipCursor, RelationshipLayout,
    RowIdLayout,
};
pub use classifier_reader::ClassifierReader;
pub use diagram_reader::DiagramReader;
pub use database::{Database, DbStats};
