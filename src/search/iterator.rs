//! Merge of the four text search cursors into one stream of hits
//!
//! Phases run strictly in order and are never revisited:
//!
//! ```text
//! Diagram -> Classifier -> Feature -> Relationship -> Done
//! ```
//!
//! A phase is exhausted once its cursor has no further row. One hit is kept
//! buffered, so `has_next()` is accurate before the first `next()`. A cursor
//! that fails is exhausted at once; the failure is reported by the next call
//! to `next()` and no hit is dropped for it.

use crate::id::RowId;
use crate::rules::{DataRules, VisibilityRules};
use crate::storage::{BorrowedStatement, RowCursor};
use crate::{Error, Result};

use super::hit::SearchHit;
use super::rows::{
    ClassifierHitLayout, DiagramHitLayout, FeatureHitLayout, FeatureHitRow, RelationshipHitLayout,
    RelationshipHitRow,
};

/// Stage of the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchPhase {
    Diagram,
    Classifier,
    Feature,
    Relationship,
    Done,
}

/// Filtered, de-duplicated stream of search hits over four lent statements.
pub struct SearchResultIterator<'r, 'conn, R: VisibilityRules = DataRules> {
    diagrams: RowCursor<'r, 'conn, DiagramHitLayout>,
    classifiers: RowCursor<'r, 'conn, ClassifierHitLayout>,
    features: RowCursor<'r, 'conn, FeatureHitLayout>,
    relationships: RowCursor<'r, 'conn, RelationshipHitLayout>,
    rules: R,
    next_hit: Option<SearchHit>,
    /// Refill failure not yet reported; it precedes `next_hit` in the stream
    failure: Option<Error>,
    /// Last accepted relationship and whether it was accepted on a scenario
    /// diagram. Only the immediately preceding relationship is remembered, so
    /// duplicates are caught only while the query keeps them adjacent.
    last_relationship: Option<(RowId, bool)>,
}

impl<'r, 'conn> SearchResultIterator<'r, 'conn, DataRules> {
    /// An iterator without statements; `has_next()` is false
    pub fn init_empty() -> Self {
        Self::with_rules(DataRules)
    }
}

impl<'r, 'conn, R: VisibilityRules> SearchResultIterator<'r, 'conn, R> {
    /// An empty iterator filtering with `rules`
    pub fn with_rules(rules: R) -> Self {
        Self {
            diagrams: RowCursor::init_empty(),
            classifiers: RowCursor::init_empty(),
            features: RowCursor::init_empty(),
            relationships: RowCursor::init_empty(),
            rules,
            next_hit: None,
            failure: None,
            last_relationship: None,
        }
    }

    /// Adopt the four slots and buffer the first hit.
    ///
    /// Every slot is adopted even if an earlier one fails to start; the first
    /// error is returned and the failed phase counts as exhausted.
    pub fn reinit(
        &mut self,
        diagram_slot: BorrowedStatement<'r, 'conn>,
        classifier_slot: BorrowedStatement<'r, 'conn>,
        feature_slot: BorrowedStatement<'r, 'conn>,
        relationship_slot: BorrowedStatement<'r, 'conn>,
    ) -> Result<()> {
        self.next_hit = None;
        self.failure = None;
        self.last_relationship = None;

        let mut first_err = None;
        for result in [
            self.diagrams.reinit(diagram_slot),
            self.classifiers.reinit(classifier_slot),
            self.features.reinit(feature_slot),
            self.relationships.reinit(relationship_slot),
        ] {
            if let Err(err) = result {
                first_err.get_or_insert(err);
            }
        }

        let filled = self.fill();
        match first_err {
            Some(err) => Err(err),
            None => filled,
        }
    }

    /// Release all four slots. Idempotent.
    pub fn destroy(&mut self) {
        self.diagrams.destroy();
        self.classifiers.destroy();
        self.features.destroy();
        self.relationships.destroy();
        self.next_hit = None;
        self.failure = None;
        self.last_relationship = None;
    }

    /// True while a hit or an unreported failure is pending
    pub fn has_next(&self) -> bool {
        debug_assert!(
            self.next_hit.is_some() || self.failure.is_some() || self.phase() == SearchPhase::Done,
            "buffer empty while a phase still has rows"
        );
        self.next_hit.is_some() || self.failure.is_some()
    }

    /// Return the buffered hit and buffer the following one.
    ///
    /// If refilling fails the failing phase is exhausted and the remaining
    /// phases still feed the buffer. The hit is returned; the error comes
    /// from the following call, before the hit buffered after it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<SearchHit> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        let Some(hit) = self.next_hit.take() else {
            return Err(Error::InvalidRequest("search result iterator is at its end".to_string()));
        };
        if let Err(err) = self.fill() {
            self.failure = Some(err);
        }
        Ok(hit)
    }

    /// Earliest phase whose cursor still has rows
    pub fn phase(&self) -> SearchPhase {
        if self.diagrams.has_next() {
            SearchPhase::Diagram
        } else if self.classifiers.has_next() {
            SearchPhase::Classifier
        } else if self.features.has_next() {
            SearchPhase::Feature
        } else if self.relationships.has_next() {
            SearchPhase::Relationship
        } else {
            SearchPhase::Done
        }
    }

    fn fill(&mut self) -> Result<()> {
        self.next_hit = None;
        let mut first_err = None;

        while self.next_hit.is_none() {
            let step = match self.phase() {
                SearchPhase::Diagram => self.diagrams.next().map(|row| {
                    Some(SearchHit::Diagram {
                        id: row.id,
                        diagram_type: row.diagram_type,
                        name: row.name,
                    })
                }),
                SearchPhase::Classifier => self.classifiers.next().map(|row| {
                    Some(SearchHit::Classifier {
                        id: row.id,
                        classifier_type: row.classifier_type,
                        name: row.name,
                        diagram_id: row.diagram_id,
                    })
                }),
                SearchPhase::Feature => {
                    let row = self.features.next();
                    row.map(|row| self.accept_feature(row))
                }
                SearchPhase::Relationship => {
                    let row = self.relationships.next();
                    row.map(|row| self.accept_relationship(row))
                }
                SearchPhase::Done => break,
            };

            match step {
                Ok(hit) => self.next_hit = hit,
                Err(err) => {
                    tracing::debug!("Search phase failed, continuing with the next: {}", err);
                    first_err.get_or_insert(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn accept_feature(&self, row: FeatureHitRow) -> Option<SearchHit> {
        if self.rules.feature_is_scenario(row.feature_type) {
            return None;
        }
        let visible = self.rules.classifier_shows_uncond_features(row.classifier_type)
            && self.rules.diagram_shows_uncond_features(row.diagram_type);
        visible.then(|| SearchHit::Feature {
            id: row.id,
            feature_type: row.feature_type,
            name: row.key,
            classifier_id: row.classifier_id,
            diagram_id: row.diagram_id,
        })
    }

    fn accept_relationship(&mut self, row: RelationshipHitRow) -> Option<SearchHit> {
        let scenario = self.rules.diagram_is_scenario(row.diagram_type);
        let visible = if scenario {
            row.connects_focused_features()
        } else {
            self.rules.diagram_shows_uncond_relationships(row.diagram_type)
                && self.last_relationship != Some((row.id, false))
        };
        if !visible {
            return None;
        }

        self.last_relationship = Some((row.id, scenario));
        Some(SearchHit::Relationship {
            id: row.id,
            relationship_type: row.relationship_type,
            name: row.name,
            from_classifier_id: row.from_classifier_id,
            to_classifier_id: row.to_classifier_id,
            diagram_id: row.diagram_id,
        })
    }
}

impl<R: VisibilityRules + Default> Default for SearchResultIterator<'_, '_, R> {
    fn default() -> Self {
        Self::with_rules(R::default())
    }
}

impl<R: VisibilityRules> std::fmt::Debug for SearchResultIterator<'_, '_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchResultIterator")
            .field("phase", &self.phase())
            .field("next_hit", &self.next_hit)
            .field("failure", &self.failure)
            .field("last_relationship", &self.last_relationship)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, ClassifierType};
    use crate::diagram::{Diagram, DiagramElement, DiagramType};
    use crate::feature::{Feature, FeatureType};
    use crate::relationship::{Relationship, RelationshipType};
    use crate::storage::test_support::*;
    use crate::storage::{ClassifierReader, Database, DiagramReader};

    fn run(db: &Database, pattern: &str) -> Vec<SearchHit> {
        let diagrams = DiagramReader::open(db.connection()).unwrap();
        let classifiers = ClassifierReader::open(db.connection()).unwrap();
        let mut iter = SearchResultIterator::init_empty();
        iter.reinit(
            diagrams.search_diagrams(pattern).unwrap(),
            classifiers.search_classifiers(pattern).unwrap(),
            classifiers.search_features(pattern).unwrap(),
            classifiers.search_relationships(pattern).unwrap(),
        )
        .unwrap();

        let mut hits = Vec::new();
        while iter.has_next() {
            hits.push(iter.next().unwrap());
        }
        assert_eq!(iter.phase(), SearchPhase::Done);
        drop(iter);
        assert!(!diagrams.has_borrowed_statements());
        assert!(!classifiers.has_borrowed_statements());
        hits
    }

    fn relationship_ids(hits: &[SearchHit]) -> Vec<RowId> {
        hits.iter()
            .filter_map(|hit| match hit {
                SearchHit::Relationship { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_iterator() {
        let mut iter = SearchResultIterator::init_empty();
        assert!(!iter.has_next());
        assert_eq!(iter.phase(), SearchPhase::Done);
        assert!(matches!(iter.next(), Err(Error::InvalidRequest(_))));
        iter.destroy();
    }

    #[test]
    fn test_no_matches_is_empty_stream() {
        let db = Database::open_in_memory().unwrap();
        insert_diagram(db.connection(), &Diagram::new(DiagramType::Class, "Overview", "u-d"));
        assert!(run(&db, "%nothing%").is_empty());
    }

    #[test]
    fn test_phase_order() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        // relationship and classifier inserted before the diagram on purpose
        let a = insert_classifier(conn, &Classifier::new(ClassifierType::Block, "Tank", "u-a"));
        let b = insert_classifier(conn, &Classifier::new(ClassifierType::Block, "Valve", "u-b"));
        insert_relationship(
            conn,
            &Relationship::new(RelationshipType::Association, a, b, "tank feed", "u-r"),
        );
        insert_feature(conn, &Feature::new(FeatureType::Property, a, "tank level", "u-f"));
        let d = insert_diagram(conn, &Diagram::new(DiagramType::BlockDefinition, "Tank farm", "u-d"));
        insert_diagram_element(conn, &DiagramElement::new(d, a, "u-e1"));
        insert_diagram_element(conn, &DiagramElement::new(d, b, "u-e2"));

        let hits = run(&db, "%tank%");
        let kinds: Vec<&str> = hits
            .iter()
            .map(|hit| match hit {
                SearchHit::Diagram { .. } => "diagram",
                SearchHit::Classifier { .. } => "classifier",
                SearchHit::Feature { .. } => "feature",
                SearchHit::Relationship { .. } => "relationship",
            })
            .collect();
        assert_eq!(kinds, vec!["diagram", "classifier", "feature", "relationship"]);
        assert!(hits.iter().skip(1).all(|hit| hit.diagram_id() == d));
    }

    #[test]
    fn test_structural_relationship_yields_one_hit() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let a = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "A", "u-a"));
        let b = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "B", "u-b"));
        let r = insert_relationship(conn, &Relationship::new(RelationshipType::Dependency, a, b, "uses", "u-r"));
        let d = insert_diagram(conn, &Diagram::new(DiagramType::Class, "Classes", "u-d"));
        // A is shown twice, so the self-join produces two rows for r
        insert_diagram_element(conn, &DiagramElement::new(d, a, "u-e1"));
        insert_diagram_element(conn, &DiagramElement::new(d, a, "u-e2"));
        insert_diagram_element(conn, &DiagramElement::new(d, b, "u-e3"));

        let hits = run(&db, "%uses%");
        assert_eq!(relationship_ids(&hits), vec![r]);
    }

    #[test]
    fn test_relationship_hidden_on_list_diagram() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let a = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "A", "u-a"));
        let b = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "B", "u-b"));
        insert_relationship(conn, &Relationship::new(RelationshipType::Dependency, a, b, "uses", "u-r"));
        let d = insert_diagram(conn, &Diagram::new(DiagramType::List, "Inventory", "u-d"));
        insert_diagram_element(conn, &DiagramElement::new(d, a, "u-e1"));
        insert_diagram_element(conn, &DiagramElement::new(d, b, "u-e2"));

        assert!(relationship_ids(&run(&db, "%uses%")).is_empty());
    }

    #[test]
    fn test_scenario_message_needs_focused_lifelines() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let a = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Client", "u-a"));
        let b = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Server", "u-b"));
        let seq = insert_diagram(conn, &Diagram::new(DiagramType::Sequence, "Login", "u-seq"));
        let other = insert_diagram(conn, &Diagram::new(DiagramType::Sequence, "Logout", "u-other"));
        let la = insert_feature(conn, &Feature::new(FeatureType::Lifeline, a, "", "u-la"));
        let lb = insert_feature(conn, &Feature::new(FeatureType::Lifeline, b, "", "u-lb"));
        let la2 = insert_feature(conn, &Feature::new(FeatureType::Lifeline, a, "", "u-la2"));
        let lb2 = insert_feature(conn, &Feature::new(FeatureType::Lifeline, b, "", "u-lb2"));
        insert_diagram_element(conn, &DiagramElement::new(seq, a, "u-e1").focused_on(la));
        insert_diagram_element(conn, &DiagramElement::new(seq, b, "u-e2").focused_on(lb));
        insert_diagram_element(conn, &DiagramElement::new(other, a, "u-e3").focused_on(la2));
        insert_diagram_element(conn, &DiagramElement::new(other, b, "u-e4").focused_on(lb2));

        let msg = insert_relationship(
            conn,
            &Relationship::new(RelationshipType::SyncCall, a, b, "login()", "u-m")
                .between_features(la, lb),
        );
        // classifier-level edge between the same classifiers is never shown on a scenario
        insert_relationship(conn, &Relationship::new(RelationshipType::Dependency, a, b, "login dep", "u-d"));

        let hits = run(&db, "%login%");
        let found: Vec<(RowId, RowId)> = hits
            .iter()
            .filter_map(|hit| match hit {
                SearchHit::Relationship { id, diagram_id, .. } => Some((*id, *diagram_id)),
                _ => None,
            })
            .collect();
        assert_eq!(found, vec![(msg, seq)]);
    }

    #[test]
    fn test_scenario_rows_judged_per_row() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let a = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "A", "u-a"));
        let b = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "B", "u-b"));
        let la = insert_feature(conn, &Feature::new(FeatureType::Lifeline, a, "", "u-la"));
        let lb = insert_feature(conn, &Feature::new(FeatureType::Lifeline, b, "", "u-lb"));
        let class_diagram = insert_diagram(conn, &Diagram::new(DiagramType::Class, "Classes", "u-cd"));
        let seq = insert_diagram(conn, &Diagram::new(DiagramType::Sequence, "Flow", "u-seq"));
        insert_diagram_element(conn, &DiagramElement::new(class_diagram, a, "u-e1"));
        insert_diagram_element(conn, &DiagramElement::new(class_diagram, b, "u-e2"));
        insert_diagram_element(conn, &DiagramElement::new(seq, a, "u-e3").focused_on(la));
        insert_diagram_element(conn, &DiagramElement::new(seq, b, "u-e4").focused_on(lb));
        let r = insert_relationship(
            conn,
            &Relationship::new(RelationshipType::AsyncCall, a, b, "notify", "u-r").between_features(la, lb),
        );

        // structural copy on the class diagram and scenario copy on the sequence diagram
        let hits = run(&db, "%notify%");
        let found: Vec<(RowId, RowId)> = hits
            .iter()
            .filter_map(|hit| match hit {
                SearchHit::Relationship { id, diagram_id, .. } => Some((*id, *diagram_id)),
                _ => None,
            })
            .collect();
        assert_eq!(found, vec![(r, class_diagram), (r, seq)]);
    }

    #[test]
    fn test_feature_visibility() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let block = insert_classifier(conn, &Classifier::new(ClassifierType::Block, "Pump", "u-c1"));
        let actor = insert_classifier(conn, &Classifier::new(ClassifierType::Actor, "Operator", "u-c2"));
        let shown = insert_feature(conn, &Feature::new(FeatureType::Property, block, "pressure", "u-f1"));
        insert_feature(conn, &Feature::new(FeatureType::Property, actor, "pressure limit", "u-f2"));
        insert_feature(conn, &Feature::new(FeatureType::Lifeline, block, "pressure line", "u-f3"));

        let bdd = insert_diagram(conn, &Diagram::new(DiagramType::BlockDefinition, "Hardware", "u-d1"));
        let list = insert_diagram(conn, &Diagram::new(DiagramType::List, "All", "u-d2"));
        insert_diagram_element(conn, &DiagramElement::new(bdd, block, "u-e1"));
        insert_diagram_element(conn, &DiagramElement::new(bdd, actor, "u-e2"));
        insert_diagram_element(conn, &DiagramElement::new(list, block, "u-e3"));

        let hits = run(&db, "%pressure%");
        let features: Vec<(RowId, RowId)> = hits
            .iter()
            .filter_map(|hit| match hit {
                SearchHit::Feature { id, diagram_id, .. } => Some((*id, *diagram_id)),
                _ => None,
            })
            .collect();
        assert_eq!(features, vec![(shown, bdd)]);
    }

    #[test]
    fn test_destroy_mid_phase_releases_everything() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        insert_diagram(conn, &Diagram::new(DiagramType::Class, "Alpha one", "u-d1"));
        insert_diagram(conn, &Diagram::new(DiagramType::Class, "Alpha two", "u-d2"));

        let diagrams = DiagramReader::open(conn).unwrap();
        let classifiers = ClassifierReader::open(conn).unwrap();
        let mut iter = SearchResultIterator::init_empty();
        iter.reinit(
            diagrams.search_diagrams("%alpha%").unwrap(),
            classifiers.search_classifiers("%alpha%").unwrap(),
            classifiers.search_features("%alpha%").unwrap(),
            classifiers.search_relationships("%alpha%").unwrap(),
        )
        .unwrap();
        assert_eq!(iter.phase(), SearchPhase::Diagram);
        iter.next().unwrap();

        iter.destroy();
        assert!(!iter.has_next());
        assert!(!diagrams.has_borrowed_statements());
        assert!(!classifiers.has_borrowed_statements());
        iter.destroy();
        diagrams.close().unwrap();
        classifiers.close().unwrap();
    }

    #[test]
    fn test_invalid_slot_is_reported_and_others_still_run() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let c = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Gamma", "u-c"));
        let d = insert_diagram(conn, &Diagram::new(DiagramType::Class, "Gamma view", "u-d"));
        insert_diagram_element(conn, &DiagramElement::new(d, c, "u-e"));

        let classifiers = ClassifierReader::open(conn).unwrap();
        let mut iter = SearchResultIterator::init_empty();
        let result = iter.reinit(
            BorrowedStatement::init_void(),
            classifiers.search_classifiers("%gamma%").unwrap(),
            classifiers.search_features("%gamma%").unwrap(),
            classifiers.search_relationships("%gamma%").unwrap(),
        );
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
        assert!(iter.has_next());
        assert!(matches!(iter.next().unwrap(), SearchHit::Classifier { .. }));
        assert!(!iter.has_next());
    }

    #[test]
    fn test_engine_error_mid_phase_keeps_other_hits() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let d = insert_diagram(conn, &Diagram::new(DiagramType::Class, "Delta view", "u-d"));
        let c = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Delta one", "u-c1"));
        insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Delta two", "u-c2"));
        insert_diagram_element(conn, &DiagramElement::new(d, c, "u-e1"));
        let f = insert_feature(conn, &Feature::new(FeatureType::Property, c, "delta size", "u-f"));

        // classifier phase: first row decodes, stepping to the second fails
        let mut preparer = Preparer::new(conn);
        let failing = preparer.prepare(
            "classifier_hits_failing",
            &format!(
                "SELECT classifiers.id, \
                 CASE WHEN classifiers.id > {c} THEN json('{{' || classifiers.id) ELSE classifiers.main_type END, \
                 classifiers.name, {d} FROM classifiers ORDER BY classifiers.rowid",
                c = c.0,
                d = d.0,
            ),
        );
        preparer.finish("test").unwrap();

        let diagrams = DiagramReader::open(conn).unwrap();
        let classifiers = ClassifierReader::open(conn).unwrap();
        let mut iter = SearchResultIterator::init_empty();
        iter.reinit(
            diagrams.search_diagrams("%delta%").unwrap(),
            BorrowedStatement::init(conn, &failing).unwrap(),
            classifiers.search_features("%delta%").unwrap(),
            classifiers.search_relationships("%delta%").unwrap(),
        )
        .unwrap();

        assert!(matches!(iter.next().unwrap(), SearchHit::Diagram { id, .. } if id == d));
        assert!(matches!(iter.next().unwrap(), SearchHit::Classifier { id, .. } if id == c));
        // the failed statement is released as soon as the step fails
        assert!(!failing.is_borrowed());
        assert!(iter.has_next());
        assert!(iter.next().unwrap_err().is_at_db());

        // the classifier phase is exhausted, the feature phase still delivers
        assert!(matches!(iter.next().unwrap(), SearchHit::Feature { id, .. } if id == f));
        assert!(!iter.has_next());
        assert_eq!(iter.phase(), SearchPhase::Done);

        iter.destroy();
        assert!(!diagrams.has_borrowed_statements());
        assert!(!classifiers.has_borrowed_statements());
        diagrams.close().unwrap();
        classifiers.close().unwrap();
    }

    #[test]
    fn test_destroy_after_engine_error_releases_remaining_slots() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let d = insert_diagram(conn, &Diagram::new(DiagramType::Class, "Echo view", "u-d1"));
        insert_diagram(conn, &Diagram::new(DiagramType::Class, "Echo more", "u-d2"));
        let c = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Echo", "u-c"));
        insert_diagram_element(conn, &DiagramElement::new(d, c, "u-e"));

        // diagram phase: second row fails
        let mut preparer = Preparer::new(conn);
        let failing = preparer.prepare(
            "diagram_hits_failing",
            &format!(
                "SELECT id, CASE WHEN id > {d} THEN json('{{' || id) ELSE diagram_type END, name \
                 FROM diagrams ORDER BY rowid",
                d = d.0,
            ),
        );
        preparer.finish("test").unwrap();

        let classifiers = ClassifierReader::open(conn).unwrap();
        let mut iter = SearchResultIterator::init_empty();
        iter.reinit(
            BorrowedStatement::init(conn, &failing).unwrap(),
            classifiers.search_classifiers("%echo%").unwrap(),
            classifiers.search_features("%echo%").unwrap(),
            classifiers.search_relationships("%echo%").unwrap(),
        )
        .unwrap();
        assert!(matches!(iter.next().unwrap(), SearchHit::Diagram { id, .. } if id == d));
        assert!(!failing.is_borrowed());
        assert!(classifiers.has_borrowed_statements());

        iter.destroy();
        assert!(!iter.has_next());
        assert!(!classifiers.has_borrowed_statements());
        classifiers.close().unwrap();
    }
}
