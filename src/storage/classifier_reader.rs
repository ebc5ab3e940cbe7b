//! Classifier reader - classifiers, features and relationships
//!
//! Prepares one statement per query shape when it opens and lends them out to
//! point lookups, cursors and the text search until it closes.

use rusqlite::Connection;

use super::layout::{
    ClassifierCursor, ClassifierLayout, FeatureCursor, FeatureLayout, RelationshipCursor,
    RelationshipLayout,
};
use super::cursor::RowLayout;
use super::lending::BorrowedStatement;
use super::reader::{bound_slot, query_cursor, query_single, Absence};
use super::statement::{finalize_all, Preparer, StatementHome};
use crate::classifier::Classifier;
use crate::feature::Feature;
use crate::id::RowId;
use crate::relationship::{Relationship, RelationshipType};
use crate::search::rows::{ClassifierHitLayout, FeatureHitLayout, RelationshipHitLayout};
use crate::Result;

const READER: &str = "ClassifierReader";

/// Read access to classifiers, features and relationships.
pub struct ClassifierReader<'conn> {
    conn: &'conn Connection,
    classifier_by_id: StatementHome<'conn>,
    classifier_by_name: StatementHome<'conn>,
    classifier_by_uuid: StatementHome<'conn>,
    classifiers_all: StatementHome<'conn>,
    classifiers_by_diagram_id: StatementHome<'conn>,
    feature_by_id: StatementHome<'conn>,
    feature_by_uuid: StatementHome<'conn>,
    features_by_classifier_id: StatementHome<'conn>,
    features_by_diagram_id: StatementHome<'conn>,
    relationship_by_id: StatementHome<'conn>,
    relationship_by_uuid: StatementHome<'conn>,
    relationships_by_classifier_id: StatementHome<'conn>,
    relationships_by_feature_id: StatementHome<'conn>,
    relationships_by_diagram_id: StatementHome<'conn>,
    classifiers_by_text: StatementHome<'conn>,
    features_by_text: StatementHome<'conn>,
    relationships_by_text: StatementHome<'conn>,
}

impl<'conn> ClassifierReader<'conn> {
    /// Prepare every statement; reports all preparation failures at once
    pub fn open(conn: &'conn Connection) -> Result<Self> {
        let classifiers = ClassifierLayout::COLUMNS;
        let features = FeatureLayout::COLUMNS;
        let relationships = RelationshipLayout::COLUMNS;

        let mut p = Preparer::new(conn);
        let reader = Self {
            conn,
            classifier_by_id: p.prepare(
                "classifier_by_id",
                &format!("SELECT {classifiers} FROM classifiers WHERE classifiers.id = ?1"),
            ),
            classifier_by_name: p.prepare(
                "classifier_by_name",
                &format!("SELECT {classifiers} FROM classifiers WHERE classifiers.name = ?1"),
            ),
            classifier_by_uuid: p.prepare(
                "classifier_by_uuid",
                &format!("SELECT {classifiers} FROM classifiers WHERE classifiers.uuid = ?1"),
            ),
            // parents before children: fewest incoming containments first
            classifiers_all: p.prepare(
                "classifiers_all",
                &format!(
                    "SELECT {classifiers}, \
                     (SELECT COUNT(*) FROM relationships \
                      WHERE relationships.to_classifier_id = classifiers.id \
                      AND relationships.to_feature_id IS NULL \
                      AND relationships.main_type = {containment}) AS containers \
                     FROM classifiers \
                     ORDER BY containers ASC, classifiers.id ASC",
                    containment = RelationshipType::Containment.code(),
                ),
            ),
            classifiers_by_diagram_id: p.prepare(
                "classifiers_by_diagram_id",
                &format!(
                    "SELECT DISTINCT {classifiers} FROM classifiers \
                     INNER JOIN diagramelements ON diagramelements.classifier_id = classifiers.id \
                     WHERE diagramelements.diagram_id = ?1 \
                     ORDER BY classifiers.list_order ASC, classifiers.id ASC"
                ),
            ),
            feature_by_id: p.prepare(
                "feature_by_id",
                &format!("SELECT {features} FROM features WHERE features.id = ?1"),
            ),
            feature_by_uuid: p.prepare(
                "feature_by_uuid",
                &format!("SELECT {features} FROM features WHERE features.uuid = ?1"),
            ),
            features_by_classifier_id: p.prepare(
                "features_by_classifier_id",
                &format!(
                    "SELECT {features} FROM features WHERE features.classifier_id = ?1 \
                     ORDER BY features.list_order ASC, features.id ASC"
                ),
            ),
            features_by_diagram_id: p.prepare(
                "features_by_diagram_id",
                &format!(
                    "SELECT DISTINCT {features} FROM features \
                     INNER JOIN diagramelements ON diagramelements.classifier_id = features.classifier_id \
                     WHERE diagramelements.diagram_id = ?1 \
                     ORDER BY features.list_order ASC, features.id ASC"
                ),
            ),
            relationship_by_id: p.prepare(
                "relationship_by_id",
                &format!("SELECT {relationships} FROM relationships WHERE relationships.id = ?1"),
            ),
            relationship_by_uuid: p.prepare(
                "relationship_by_uuid",
                &format!("SELECT {relationships} FROM relationships WHERE relationships.uuid = ?1"),
            ),
            relationships_by_classifier_id: p.prepare(
                "relationships_by_classifier_id",
                &format!(
                    "SELECT {relationships} FROM relationships \
                     WHERE relationships.from_classifier_id = ?1 OR relationships.to_classifier_id = ?1 \
                     ORDER BY relationships.list_order ASC, relationships.id ASC"
                ),
            ),
            relationships_by_feature_id: p.prepare(
                "relationships_by_feature_id",
                &format!(
                    "SELECT {relationships} FROM relationships \
                     WHERE relationships.from_feature_id = ?1 OR relationships.to_feature_id = ?1 \
                     ORDER BY relationships.list_order ASC, relationships.id ASC"
                ),
            ),
            relationships_by_diagram_id: p.prepare(
                "relationships_by_diagram_id",
                &format!(
                    "SELECT DISTINCT {relationships} FROM relationships \
                     INNER JOIN diagramelements AS source \
                       ON source.classifier_id = relationships.from_classifier_id \
                     INNER JOIN diagramelements AS dest \
                       ON dest.classifier_id = relationships.to_classifier_id \
                       AND dest.diagram_id = source.diagram_id \
                     WHERE source.diagram_id = ?1 \
                     ORDER BY relationships.list_order ASC, relationships.id ASC"
                ),
            ),
            // one row per (classifier, diagram)
            classifiers_by_text: p.prepare(
                "classifiers_by_text",
                &format!(
                    "SELECT {hit} FROM classifiers \
                     INNER JOIN diagramelements ON diagramelements.classifier_id = classifiers.id \
                     INNER JOIN diagrams ON diagrams.id = diagramelements.diagram_id \
                     WHERE classifiers.name LIKE ?1 ESCAPE '\\' \
                       OR classifiers.stereotype LIKE ?1 ESCAPE '\\' \
                       OR classifiers.description LIKE ?1 ESCAPE '\\' \
                     GROUP BY classifiers.id, diagrams.id \
                     ORDER BY classifiers.id ASC, diagrams.id ASC",
                    hit = ClassifierHitLayout::COLUMNS,
                ),
            ),
            // one row per (feature, diagram)
            features_by_text: p.prepare(
                "features_by_text",
                &format!(
                    "SELECT {hit} FROM features \
                     INNER JOIN classifiers ON classifiers.id = features.classifier_id \
                     INNER JOIN diagramelements ON diagramelements.classifier_id = classifiers.id \
                     INNER JOIN diagrams ON diagrams.id = diagramelements.diagram_id \
                     WHERE features.key LIKE ?1 ESCAPE '\\' \
                       OR features.value LIKE ?1 ESCAPE '\\' \
                       OR features.description LIKE ?1 ESCAPE '\\' \
                     GROUP BY features.id, diagrams.id \
                     ORDER BY features.id ASC, diagrams.id ASC",
                    hit = FeatureHitLayout::COLUMNS,
                ),
            ),
            // one row per pair of diagram elements showing both ends; copies of
            // one relationship within one diagram are adjacent
            relationships_by_text: p.prepare(
                "relationships_by_text",
                &format!(
                    "SELECT {hit} FROM relationships \
                     INNER JOIN diagramelements AS source \
                       ON source.classifier_id = relationships.from_classifier_id \
                     INNER JOIN diagramelements AS dest \
                       ON dest.classifier_id = relationships.to_classifier_id \
                       AND dest.diagram_id = source.diagram_id \
                     INNER JOIN diagrams ON diagrams.id = source.diagram_id \
                     WHERE relationships.name LIKE ?1 ESCAPE '\\' \
                       OR relationships.stereotype LIKE ?1 ESCAPE '\\' \
                       OR relationships.description LIKE ?1 ESCAPE '\\' \
                     ORDER BY relationships.id ASC, diagrams.id ASC, source.id ASC, dest.id ASC",
                    hit = RelationshipHitLayout::COLUMNS,
                ),
            ),
        };
        p.finish(READER)?;
        Ok(reader)
    }

    fn homes(&self) -> [&StatementHome<'conn>; 17] {
        [
            &self.classifier_by_id,
            &self.classifier_by_name,
            &self.classifier_by_uuid,
            &self.classifiers_all,
            &self.classifiers_by_diagram_id,
            &self.feature_by_id,
            &self.feature_by_uuid,
            &self.features_by_classifier_id,
            &self.features_by_diagram_id,
            &self.relationship_by_id,
            &self.relationship_by_uuid,
            &self.relationships_by_classifier_id,
            &self.relationships_by_feature_id,
            &self.relationships_by_diagram_id,
            &self.classifiers_by_text,
            &self.features_by_text,
            &self.relationships_by_text,
        ]
    }

    /// Finalize all statements.
    ///
    /// Fails with `WrongState` (and finalizes nothing) while a cursor or
    /// search obtained from this reader is still alive.
    pub fn close(&self) -> Result<()> {
        finalize_all(READER, &self.homes())
    }

    /// True while any statement of this reader is lent out
    pub fn has_borrowed_statements(&self) -> bool {
        self.homes().iter().any(|home| home.is_borrowed())
    }

    // ========== Classifiers ==========

    /// Classifier by id; a missing row is a structural error
    pub fn get_classifier_by_id(&self, id: RowId) -> Result<Classifier> {
        query_single::<ClassifierLayout, _>(self.conn, &self.classifier_by_id, id, Absence::Structural)
    }

    pub fn get_classifier_by_name(&self, name: &str) -> Result<Classifier> {
        query_single::<ClassifierLayout, _>(self.conn, &self.classifier_by_name, name, Absence::Expected)
    }

    pub fn get_classifier_by_uuid(&self, uuid: &str) -> Result<Classifier> {
        query_single::<ClassifierLayout, _>(self.conn, &self.classifier_by_uuid, uuid, Absence::Expected)
    }

    /// All classifiers, containers before their contents, ties by id
    pub fn get_classifiers_all(&self) -> Result<ClassifierCursor<'_, 'conn>> {
        let slot = BorrowedStatement::init(self.conn, &self.classifiers_all)?;
        ClassifierCursor::new(slot)
    }

    /// Classifiers shown on a diagram, each once
    pub fn get_classifiers_by_diagram_id(&self, diagram_id: RowId) -> Result<ClassifierCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.classifiers_by_diagram_id, diagram_id)
    }

    // ========== Features ==========

    pub fn get_feature_by_id(&self, id: RowId) -> Result<Feature> {
        query_single::<FeatureLayout, _>(self.conn, &self.feature_by_id, id, Absence::Structural)
    }

    pub fn get_feature_by_uuid(&self, uuid: &str) -> Result<Feature> {
        query_single::<FeatureLayout, _>(self.conn, &self.feature_by_uuid, uuid, Absence::Expected)
    }

    pub fn get_features_by_classifier_id(&self, classifier_id: RowId) -> Result<FeatureCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.features_by_classifier_id, classifier_id)
    }

    /// Features of all classifiers shown on a diagram
    pub fn get_features_by_diagram_id(&self, diagram_id: RowId) -> Result<FeatureCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.features_by_diagram_id, diagram_id)
    }

    // ========== Relationships ==========

    pub fn get_relationship_by_id(&self, id: RowId) -> Result<Relationship> {
        query_single::<RelationshipLayout, _>(self.conn, &self.relationship_by_id, id, Absence::Structural)
    }

    pub fn get_relationship_by_uuid(&self, uuid: &str) -> Result<Relationship> {
        query_single::<RelationshipLayout, _>(self.conn, &self.relationship_by_uuid, uuid, Absence::Expected)
    }

    /// Relationships starting or ending at a classifier
    pub fn get_relationships_by_classifier_id(
        &self,
        classifier_id: RowId,
    ) -> Result<RelationshipCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.relationships_by_classifier_id, classifier_id)
    }

    /// Relationships starting or ending at a feature
    pub fn get_relationships_by_feature_id(&self, feature_id: RowId) -> Result<RelationshipCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.relationships_by_feature_id, feature_id)
    }

    /// Relationships whose both ends are shown on a diagram
    pub fn get_relationships_by_diagram_id(&self, diagram_id: RowId) -> Result<RelationshipCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.relationships_by_diagram_id, diagram_id)
    }

    // ========== Text search ==========

    /// Lend the classifier text search with `pattern` (a LIKE pattern) bound
    pub fn search_classifiers(&self, pattern: &str) -> Result<BorrowedStatement<'_, 'conn>> {
        bound_slot(self.conn, &self.classifiers_by_text, pattern)
    }

    pub fn search_features(&self, pattern: &str) -> Result<BorrowedStatement<'_, 'conn>> {
        bound_slot(self.conn, &self.features_by_text, pattern)
    }

    pub fn search_relationships(&self, pattern: &str) -> Result<BorrowedStatement<'_, 'conn>> {
        bound_slot(self.conn, &self.relationships_by_text, pattern)
    }
}

impl std::fmt::Debug for ClassifierReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(READER)
            .field("borrowed", &self.has_borrowed_statements())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierType;
    use crate::feature::FeatureType;
    use crate::storage::test_support::*;
    use crate::storage::Database;
    use crate::Error;

    #[test]
    fn test_open_and_close() {
        let db = Database::open_in_memory().unwrap();
        let reader = ClassifierReader::open(db.connection()).unwrap();
        reader.close().unwrap();
        assert!(matches!(
            reader.get_classifier_by_name("x"),
            Err(Error::WrongState(_))
        ));
    }

    #[test]
    fn test_open_reports_every_failure() {
        // no schema: every statement fails to prepare
        let conn = Connection::open_in_memory().unwrap();
        match ClassifierReader::open(&conn) {
            Err(Error::Prepare { failures }) => assert_eq!(failures.len(), 17),
            other => panic!("expected prepare failures, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_classifier_lookups() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let id = insert_classifier(
            conn,
            &Classifier::new(ClassifierType::Block, "Pump", "uuid-pump")
                .with_stereotype("hw")
                .with_description("moves water")
                .with_order(1, 2, 3),
        );
        let reader = ClassifierReader::open(conn).unwrap();

        let by_id = reader.get_classifier_by_id(id).unwrap();
        assert_eq!(by_id.name, "Pump");
        assert_eq!(by_id.stereotype, "hw");
        assert_eq!(by_id.description, "moves water");
        assert_eq!(reader.get_classifier_by_name("Pump").unwrap(), by_id);
        assert_eq!(reader.get_classifier_by_uuid("uuid-pump").unwrap(), by_id);
    }

    #[test]
    fn test_missing_rows() {
        let db = Database::open_in_memory().unwrap();
        let reader = ClassifierReader::open(db.connection()).unwrap();

        assert!(matches!(reader.get_classifier_by_id(RowId(5)), Err(Error::DbStructure(_))));
        assert!(matches!(reader.get_classifier_by_name("nope"), Err(Error::NotFound(_))));
        assert!(matches!(reader.get_classifier_by_uuid("nope"), Err(Error::NotFound(_))));
        assert!(matches!(reader.get_feature_by_id(RowId(5)), Err(Error::DbStructure(_))));
        assert!(matches!(reader.get_relationship_by_uuid("nope"), Err(Error::NotFound(_))));
        // a failed lookup does not keep the statement lent out
        assert!(!reader.has_borrowed_statements());
    }

    #[test]
    fn test_duplicate_row_is_structural_error() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        // features.uuid is unique; drop the index to simulate a corrupted file
        conn.execute_batch(
            "CREATE TABLE features_copy AS SELECT * FROM features; DROP TABLE features; \
             ALTER TABLE features_copy RENAME TO features;",
        )
        .unwrap();
        conn.execute_batch(
            "INSERT INTO features (id, main_type, classifier_id, key, list_order, uuid) VALUES (1, 1, 1, 'a', 0, 'dup'); \
             INSERT INTO features (id, main_type, classifier_id, key, list_order, uuid) VALUES (2, 1, 1, 'b', 0, 'dup');",
        )
        .unwrap();
        let reader = ClassifierReader::open(conn).unwrap();

        assert!(matches!(reader.get_feature_by_uuid("dup"), Err(Error::DbStructure(_))));
        assert!(!reader.has_borrowed_statements());
    }

    #[test]
    fn test_containment_order() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        // ids are assigned so that the child has the smallest id
        let child = insert_classifier(conn, &Classifier::new(ClassifierType::Part, "Child", "u-1"));
        let parent = insert_classifier(conn, &Classifier::new(ClassifierType::Block, "Parent", "u-2"));
        let loose = insert_classifier(conn, &Classifier::new(ClassifierType::Block, "Loose", "u-3"));
        insert_relationship(
            conn,
            &Relationship::new(RelationshipType::Containment, parent, child, "", "u-r1"),
        );

        let reader = ClassifierReader::open(conn).unwrap();
        let mut cursor = reader.get_classifiers_all().unwrap();
        let mut order = Vec::new();
        while cursor.has_next() {
            order.push(cursor.next().unwrap().id);
        }
        assert_eq!(order, vec![parent, loose, child]);
    }

    #[test]
    fn test_features_by_classifier_in_list_order() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let c = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Car", "u-c"));
        let other = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Bike", "u-b"));
        let late = insert_feature(conn, &Feature::new(FeatureType::Operation, c, "drive", "u-f1").with_list_order(20));
        let early = insert_feature(conn, &Feature::new(FeatureType::Property, c, "speed", "u-f2").with_list_order(10));
        let tie = insert_feature(conn, &Feature::new(FeatureType::Property, c, "color", "u-f3").with_list_order(20));
        insert_feature(conn, &Feature::new(FeatureType::Property, other, "gears", "u-f4"));

        let reader = ClassifierReader::open(conn).unwrap();
        let mut cursor = reader.get_features_by_classifier_id(c).unwrap();
        let ids: Vec<RowId> = cursor.next_batch(10).unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![early, late, tie]);
    }

    #[test]
    fn test_relationship_feature_ends_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let a = insert_classifier(conn, &Classifier::new(ClassifierType::Component, "A", "u-a"));
        let b = insert_classifier(conn, &Classifier::new(ClassifierType::Component, "B", "u-b"));
        let port = insert_feature(conn, &Feature::new(FeatureType::Port, a, "out", "u-p"));
        let plain = insert_relationship(
            conn,
            &Relationship::new(RelationshipType::Dependency, a, b, "plain", "u-r1"),
        );
        let mut ported = Relationship::new(RelationshipType::Association, a, b, "ported", "u-r2")
            .with_description("");
        ported.from_feature_id = port;
        let ported_id = insert_relationship(conn, &ported);

        let reader = ClassifierReader::open(conn).unwrap();
        let r = reader.get_relationship_by_id(plain).unwrap();
        assert!(r.from_feature_id.is_void());
        assert!(r.to_feature_id.is_void());

        let r = reader.get_relationship_by_id(ported_id).unwrap();
        ported.id = ported_id;
        assert_eq!(r, ported);

        let mut cursor = reader.get_relationships_by_feature_id(port).unwrap();
        assert_eq!(cursor.next().unwrap().id, ported_id);
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_empty_diagram_has_no_classifiers() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Unplaced", "u-c"));
        let diagram = insert_diagram(conn, &crate::diagram::Diagram::new(crate::diagram::DiagramType::Class, "Empty", "u-d"));

        let reader = ClassifierReader::open(conn).unwrap();
        let mut cursor = reader.get_classifiers_by_diagram_id(diagram).unwrap();
        assert!(!cursor.has_next());
        assert!(matches!(cursor.next(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_close_with_live_cursor_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let c = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Car", "u-c"));
        insert_feature(conn, &Feature::new(FeatureType::Property, c, "speed", "u-f"));

        let reader = ClassifierReader::open(conn).unwrap();
        let cursor = reader.get_features_by_classifier_id(c).unwrap();
        assert!(matches!(reader.close(), Err(Error::WrongState(_))));

        // the reader stays usable, and closes once the cursor is gone
        assert_eq!(reader.get_classifier_by_id(c).unwrap().name, "Car");
        drop(cursor);
        reader.close().unwrap();
    }

    #[test]
    fn test_second_cursor_on_same_query_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let c = insert_classifier(conn, &Classifier::new(ClassifierType::Class, "Car", "u-c"));

        let reader = ClassifierReader::open(conn).unwrap();
        let mut first = reader.get_relationships_by_classifier_id(c).unwrap();
        assert!(matches!(
            reader.get_relationships_by_classifier_id(c),
            Err(Error::WrongState(_))
        ));
        // a different query shape is independent
        assert!(reader.get_relationships_by_feature_id(RowId(1)).is_ok());

        first.destroy();
        assert!(reader.get_relationships_by_classifier_id(c).is_ok());
    }
}
