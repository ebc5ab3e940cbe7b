//! Cross-entity text search
//!
//! Four queries (diagrams, classifiers, features, relationships) are drained in
//! that order into one stream of `SearchHit`s. Features and relationships are
//! filtered by `VisibilityRules` so a hit is only reported where the diagram
//! actually shows it.

mod hit;
mod iterator;
pub(crate) mod rows;
mod text;

pub use hit::SearchHit;
pub use iterator::{SearchPhase, SearchResultIterator};
pub use text::TextSearch;
