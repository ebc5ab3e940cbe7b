//! Text search over all entity kinds

use crate::rules::DataRules;
use crate::storage::{ClassifierReader, DiagramReader};
use crate::Result;

use super::hit::SearchHit;
use super::iterator::SearchResultIterator;

/// Searches names, stereotypes and descriptions through two open readers.
///
/// Only one search per reader pair can run at a time: the search statements
/// stay lent to the returned iterator until it is dropped or destroyed.
#[derive(Debug, Clone, Copy)]
pub struct TextSearch<'r, 'conn> {
    diagrams: &'r DiagramReader<'conn>,
    classifiers: &'r ClassifierReader<'conn>,
}

impl<'r, 'conn> TextSearch<'r, 'conn> {
    pub fn new(diagrams: &'r DiagramReader<'conn>, classifiers: &'r ClassifierReader<'conn>) -> Self {
        Self { diagrams, classifiers }
    }

    /// Escape `fragment` for `LIKE ... ESCAPE '\'` and match it anywhere
    pub fn like_pattern(fragment: &str) -> String {
        let mut pattern = String::with_capacity(fragment.len() + 2);
        pattern.push('%');
        for c in fragment.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }

    /// Start a search for `fragment`
    pub fn search(&self, fragment: &str) -> Result<SearchResultIterator<'r, 'conn, DataRules>> {
        let pattern = Self::like_pattern(fragment);
        tracing::debug!("Searching for {:?}", pattern);

        let mut iter = SearchResultIterator::init_empty();
        iter.reinit(
            self.diagrams.search_diagrams(&pattern)?,
            self.classifiers.search_classifiers(&pattern)?,
            self.classifiers.search_features(&pattern)?,
            self.classifiers.search_relationships(&pattern)?,
        )?;
        Ok(iter)
    }

    /// Run a search and collect at most `max` hits
    pub fn collect(&self, fragment: &str, max: usize) -> Result<Vec<SearchHit>> {
        let mut iter = self.search(fragment)?;
        let mut hits = Vec::new();
        while hits.len() < max && iter.has_next() {
            hits.push(iter.next()?);
        }
        Ok(hits)
    }
}
