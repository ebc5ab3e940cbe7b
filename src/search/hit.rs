//! Search hits

use serde::Serialize;

use crate::classifier::ClassifierType;
use crate::diagram::DiagramType;
use crate::feature::FeatureType;
use crate::id::{EntityId, RowId, TableKind};
use crate::relationship::RelationshipType;

/// One matched entity, together with the diagram it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchHit {
    Diagram {
        id: RowId,
        diagram_type: DiagramType,
        name: String,
    },
    Classifier {
        id: RowId,
        classifier_type: ClassifierType,
        name: String,
        diagram_id: RowId,
    },
    Feature {
        id: RowId,
        feature_type: FeatureType,
        name: String,
        classifier_id: RowId,
        diagram_id: RowId,
    },
    Relationship {
        id: RowId,
        relationship_type: RelationshipType,
        name: String,
        from_classifier_id: RowId,
        to_classifier_id: RowId,
        diagram_id: RowId,
    },
}

impl SearchHit {
    pub fn entity_id(&self) -> EntityId {
        match self {
            SearchHit::Diagram { id, .. } => EntityId::new(TableKind::Diagram, *id),
            SearchHit::Classifier { id, .. } => EntityId::new(TableKind::Classifier, *id),
            SearchHit::Feature { id, .. } => EntityId::new(TableKind::Feature, *id),
            SearchHit::Relationship { id, .. } => EntityId::new(TableKind::Relationship, *id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SearchHit::Diagram { name, .. }
            | SearchHit::Classifier { name, .. }
            | SearchHit::Feature { name, .. }
            | SearchHit::Relationship { name, .. } => name,
        }
    }

    /// The diagram the hit was found on; a diagram hit is its own diagram
    pub fn diagram_id(&self) -> RowId {
        match self {
            SearchHit::Diagram { id, .. } => *id,
            SearchHit::Classifier { diagram_id, .. }
            | SearchHit::Feature { diagram_id, .. }
            | SearchHit::Relationship { diagram_id, .. } => *diagram_id,
        }
    }

    /// Kind name of the matched entity, e.g. `block` or `lifeline`
    pub fn type_name(&self) -> &'static str {
        match self {
            SearchHit::Diagram { diagram_type, .. } => diagram_type.as_str(),
            SearchHit::Classifier { classifier_type, .. } => classifier_type.as_str(),
            SearchHit::Feature { feature_type, .. } => feature_type.as_str(),
            SearchHit::Relationship { relationship_type, .. } => relationship_type.as_str(),
        }
    }
}
