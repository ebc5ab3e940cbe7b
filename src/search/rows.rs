//! Row layouts of the four text search queries
//!
//! Every row pairs the matched entity with one diagram it appears on. The
//! relationship row also carries what the visibility filter needs: both
//! feature ends and the focused features of the two diagram elements.

use rusqlite::Row;

use crate::classifier::ClassifierType;
use crate::diagram::DiagramType;
use crate::feature::FeatureType;
use crate::id::RowId;
use crate::relationship::RelationshipType;
use crate::storage::RowLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramHitRow {
    pub id: RowId,
    pub diagram_type: DiagramType,
    pub name: String,
}

pub struct DiagramHitLayout;

impl RowLayout for DiagramHitLayout {
    type Record = DiagramHitRow;

    const COLUMNS: &'static str = "diagrams.id, diagrams.diagram_type, diagrams.name";

    fn decode(row: &Row<'_>) -> rusqlite::Result<DiagramHitRow> {
        Ok(DiagramHitRow {
            id: row.get(0)?,
            diagram_type: row.get(1)?,
            name: row.get(2)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierHitRow {
    pub id: RowId,
    pub classifier_type: ClassifierType,
    pub name: String,
    pub diagram_id: RowId,
}

pub struct ClassifierHitLayout;

impl RowLayout for ClassifierHitLayout {
    type Record = ClassifierHitRow;

    const COLUMNS: &'static str =
        "classifiers.id, classifiers.main_type, classifiers.name, diagrams.id";

    fn decode(row: &Row<'_>) -> rusqlite::Result<ClassifierHitRow> {
        Ok(ClassifierHitRow {
            id: row.get(0)?,
            classifier_type: row.get(1)?,
            name: row.get(2)?,
            diagram_id: row.get(3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureHitRow {
    pub id: RowId,
    pub feature_type: FeatureType,
    pub key: String,
    pub classifier_id: RowId,
    pub classifier_type: ClassifierType,
    pub diagram_id: RowId,
    pub diagram_type: DiagramType,
}

pub struct FeatureHitLayout;

impl RowLayout for FeatureHitLayout {
    type Record = FeatureHitRow;

    const COLUMNS: &'static str = "features.id, features.main_type, features.key, \
        features.classifier_id, classifiers.main_type, diagrams.id, diagrams.diagram_type";

    fn decode(row: &Row<'_>) -> rusqlite::Result<FeatureHitRow> {
        Ok(FeatureHitRow {
            id: row.get(0)?,
            feature_type: row.get(1)?,
            key: row.get(2)?,
            classifier_id: row.get(3)?,
            classifier_type: row.get(4)?,
            diagram_id: row.get(5)?,
            diagram_type: row.get(6)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipHitRow {
    pub id: RowId,
    pub relationship_type: RelationshipType,
    pub name: String,
    pub from_classifier_id: RowId,
    pub to_classifier_id: RowId,
    pub from_feature_id: RowId,
    pub to_feature_id: RowId,
    /// focused feature of the diagram element at the source end
    pub source_focus_id: RowId,
    /// focused feature of the diagram element at the destination end
    pub dest_focus_id: RowId,
    pub diagram_id: RowId,
    pub diagram_type: DiagramType,
}

impl RelationshipHitRow {
    /// Both ends attach to the features the two diagram elements focus on
    pub fn connects_focused_features(&self) -> bool {
        !self.from_feature_id.is_void()
            && !self.to_feature_id.is_void()
            && self.from_feature_id == self.source_focus_id
            && self.to_feature_id == self.dest_focus_id
    }
}

pub struct RelationshipHitLayout;

impl RowLayout for RelationshipHitLayout {
    type Record = RelationshipHitRow;

    const COLUMNS: &'static str = "relationships.id, relationships.main_type, relationships.name, \
        relationships.from_classifier_id, relationships.to_classifier_id, \
        relationships.from_feature_id, relationships.to_feature_id, \
        source.focused_feature_id, dest.focused_feature_id, diagrams.id, diagrams.diagram_type";

    fn decode(row: &Row<'_>) -> rusqlite::Result<RelationshipHitRow> {
        Ok(RelationshipHitRow {
            id: row.get(0)?,
            relationship_type: row.get(1)?,
            name: row.get(2)?,
            from_classifier_id: row.get(3)?,
            to_classifier_id: row.get(4)?,
            from_feature_id: row.get(5)?,
            to_feature_id: row.get(6)?,
            source_focus_id: row.get(7)?,
            dest_focus_id: row.get(8)?,
            diagram_id: row.get(9)?,
            diagram_type: row.get(10)?,
        })
    }
}
