//! Column layouts of the five entity tables
//!
//! Each select list is table-qualified so it can be used in joins. NULL text
//! decodes to an empty string, NULL foreign keys to `RowId::VOID`.

use rusqlite::Row;

use super::cursor::{RowCursor, RowLayout};
use crate::classifier::Classifier;
use crate::diagram::{Diagram, DiagramElement};
use crate::feature::Feature;
use crate::id::RowId;
use crate::relationship::Relationship;

fn text_or_empty(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

pub struct ClassifierLayout;

impl RowLayout for ClassifierLayout {
    type Record = Classifier;

    const COLUMNS: &'static str = "classifiers.id, classifiers.main_type, classifiers.stereotype, \
        classifiers.name, classifiers.description, classifiers.x_order, classifiers.y_order, \
        classifiers.list_order, classifiers.uuid";

    fn decode(row: &Row<'_>) -> rusqlite::Result<Classifier> {
        Ok(Classifier {
            id: row.get(0)?,
            main_type: row.get(1)?,
            stereotype: text_or_empty(row, 2)?,
            name: row.get(3)?,
            description: text_or_empty(row, 4)?,
            x_order: row.get(5)?,
            y_order: row.get(6)?,
            list_order: row.get(7)?,
            uuid: row.get(8)?,
        })
    }
}

pub struct FeatureLayout;

impl RowLayout for FeatureLayout {
    type Record = Feature;

    const COLUMNS: &'static str = "features.id, features.main_type, features.classifier_id, \
        features.key, features.value, features.description, features.list_order, features.uuid";

    fn decode(row: &Row<'_>) -> rusqlite::Result<Feature> {
        Ok(Feature {
            id: row.get(0)?,
            main_type: row.get(1)?,
            classifier_id: row.get(2)?,
            key: row.get(3)?,
            value: text_or_empty(row, 4)?,
            description: text_or_empty(row, 5)?,
            list_order: row.get(6)?,
            uuid: row.get(7)?,
        })
    }
}

pub struct RelationshipLayout;

impl RowLayout for RelationshipLayout {
    type Record = Relationship;

    const COLUMNS: &'static str = "relationships.id, relationships.main_type, \
        relationships.from_classifier_id, relationships.to_classifier_id, \
        relationships.stereotype, relationships.name, relationships.description, \
        relationships.list_order, relationships.from_feature_id, relationships.to_feature_id, \
        relationships.uuid";

    fn decode(row: &Row<'_>) -> rusqlite::Result<Relationship> {
        Ok(Relationship {
            id: row.get(0)?,
            main_type: row.get(1)?,
            from_classifier_id: row.get(2)?,
            to_classifier_id: row.get(3)?,
            stereotype: text_or_empty(row, 4)?,
            name: row.get(5)?,
            description: text_or_empty(row, 6)?,
            list_order: row.get(7)?,
            from_feature_id: row.get(8)?,
            to_feature_id: row.get(9)?,
            uuid: row.get(10)?,
        })
    }
}

pub struct DiagramLayout;

impl RowLayout for DiagramLayout {
    type Record = Diagram;

    const COLUMNS: &'static str = "diagrams.id, diagrams.parent_id, diagrams.diagram_type, \
        diagrams.stereotype, diagrams.name, diagrams.description, diagrams.list_order, \
        diagrams.display_flags, diagrams.uuid";

    fn decode(row: &Row<'_>) -> rusqlite::Result<Diagram> {
        Ok(Diagram {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            diagram_type: row.get(2)?,
            stereotype: text_or_empty(row, 3)?,
            name: row.get(4)?,
            description: text_or_empty(row, 5)?,
            list_order: row.get(6)?,
            display_flags: row.get(7)?,
            uuid: row.get(8)?,
        })
    }
}

pub struct DiagramElementLayout;

impl RowLayout for DiagramElementLayout {
    type Record = DiagramElement;

    const COLUMNS: &'static str = "diagramelements.id, diagramelements.diagram_id, \
        diagramelements.classifier_id, diagramelements.display_flags, \
        diagramelements.focused_feature_id, diagramelements.uuid";

    fn decode(row: &Row<'_>) -> rusqlite::Result<DiagramElement> {
        Ok(DiagramElement {
            id: row.get(0)?,
            diagram_id: row.get(1)?,
            classifier_id: row.get(2)?,
            display_flags: row.get(3)?,
            focused_feature_id: row.get(4)?,
            uuid: row.get(5)?,
        })
    }
}

/// Single id column, used by the bounded id lists
pub struct RowIdLayout;

impl RowLayout for RowIdLayout {
    type Record = RowId;

    const COLUMNS: &'static str = "id";

    fn decode(row: &Row<'_>) -> rusqlite::Result<RowId> {
        row.get(0)
    }
}

pub type ClassifierCursor<'r, 'conn> = RowCursor<'r, 'conn, ClassifierLayout>;
pub type FeatureCursor<'r, 'conn> = RowCursor<'r, 'conn, FeatureLayout>;
pub type RelationshipCursor<'r, 'conn> = RowCursor<'r, 'conn, RelationshipLayout>;
pub type DiagramCursor<'r, 'conn> = RowCursor<'r, 'conn, DiagramLayout>;
pub type DiagramElementCursor<'r, 'conn> = RowCursor<'r, 'conn, DiagramElementLayout>;
