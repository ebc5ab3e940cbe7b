//! Insert helpers for tests. The readers never write.

use rusqlite::{params, Connection};

use crate::classifier::Classifier;
use crate::diagram::{Diagram, DiagramElement};
use crate::feature::Feature;
use crate::id::RowId;
use crate::relationship::Relationship;

pub(crate) use super::statement::Preparer;

pub(crate) fn insert_classifier(conn: &Connection, c: &Classifier) -> RowId {
    conn.execute(
        "INSERT INTO classifiers (main_type, stereotype, name, description, x_order, y_order, list_order, uuid) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![c.main_type, c.stereotype, c.name, c.description, c.x_order, c.y_order, c.list_order, c.uuid],
    )
    .unwrap();
    RowId(conn.last_insert_rowid())
}

pub(crate) fn insert_feature(conn: &Connection, f: &Feature) -> RowId {
    conn.execute(
        "INSERT INTO features (main_type, classifier_id, key, value, description, list_order, uuid) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![f.main_type, f.classifier_id, f.key, f.value, f.description, f.list_order, f.uuid],
    )
    .unwrap();
    RowId(conn.last_insert_rowid())
}

pub(crate) fn insert_relationship(conn: &Connection, r: &Relationship) -> RowId {
    conn.execute(
        "INSERT INTO relationships (main_type, from_classifier_id, to_classifier_id, stereotype, name, \
         description, list_order, from_feature_id, to_feature_id, uuid) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            r.main_type,
            r.from_classifier_id,
            r.to_classifier_id,
            r.stereotype,
            r.name,
            r.description,
            r.list_order,
            r.from_feature_id,
            r.to_feature_id,
            r.uuid,
        ],
    )
    .unwrap();
    RowId(conn.last_insert_rowid())
}

pub(crate) fn insert_diagram(conn: &Connection, d: &Diagram) -> RowId {
    conn.execute(
        "INSERT INTO diagrams (parent_id, diagram_type, stereotype, name, description, list_order, display_flags, uuid) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            d.parent_id,
            d.diagram_type,
            d.stereotype,
            d.name,
            d.description,
            d.list_order,
            d.display_flags,
            d.uuid,
        ],
    )
    .unwrap();
    RowId(conn.last_insert_rowid())
}

pub(crate) fn insert_diagram_element(conn: &Connection, e: &DiagramElement) -> RowId {
    conn.execute(
        "INSERT INTO diagramelements (diagram_id, classifier_id, display_flags, focused_feature_id, uuid) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![e.diagram_id, e.classifier_id, e.display_flags, e.focused_feature_id, e.uuid],
    )
    .unwrap();
    RowId(conn.last_insert_rowid())
}
