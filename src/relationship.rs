//! Relationships - directed edges between classifiers
//!
//! Both ends name a classifier. Each end may additionally name one feature of
//! that classifier, e.g. a port, or the lifeline a message starts from.
//! A void feature id means the relationship attaches to the classifier itself.

use crate::id::{EntityId, RowId, TableKind};
use serde::{Deserialize, Serialize};

coded_kind! {
    /// Kind of a relationship, persisted as `relationships.main_type`
    pub enum RelationshipType {
        Dependency = 1 => "dependency",
        Association = 2 => "association",
        Aggregation = 3 => "aggregation",
        Composition = 4 => "composition",
        Generalization = 5 => "generalization",
        Realization = 6 => "realization",
        AsyncCall = 10 => "async_call",
        SyncCall = 11 => "sync_call",
        ReturnCall = 12 => "return_call",
        CommunicationPath = 13 => "communication_path",
        ControlFlow = 20 => "control_flow",
        ObjectFlow = 21 => "object_flow",
        Deploy = 30 => "deploy",
        Manifest = 31 => "manifest",
        Extend = 40 => "extend",
        Include = 41 => "include",
        /// Parent contains child; drives the export order of classifiers
        Containment = 50 => "containment",
        Refine = 60 => "refine",
        Trace = 61 => "trace",
    }
}

impl RelationshipType {
    /// Messages exchanged between lifelines
    pub fn is_message(&self) -> bool {
        matches!(
            self,
            RelationshipType::AsyncCall | RelationshipType::SyncCall | RelationshipType::ReturnCall
        )
    }
}

/// A relationship row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RowId,
    pub main_type: RelationshipType,
    pub from_classifier_id: RowId,
    /// Void if the relationship starts at the classifier itself
    pub from_feature_id: RowId,
    pub to_classifier_id: RowId,
    /// Void if the relationship ends at the classifier itself
    pub to_feature_id: RowId,
    pub stereotype: String,
    pub name: String,
    pub description: String,
    pub list_order: i32,
    pub uuid: String,
}

impl Relationship {
    /// Create a classifier-to-classifier relationship that is not yet stored
    pub fn new(
        main_type: RelationshipType,
        from_classifier_id: RowId,
        to_classifier_id: RowId,
        name: impl Into<String>,
        uuid: impl Into<String>,
    ) -> Self {
        Self {
            id: RowId::VOID,
            main_type,
            from_classifier_id,
            from_feature_id: RowId::VOID,
            to_classifier_id,
            to_feature_id: RowId::VOID,
            stereotype: String::new(),
            name: name.into(),
            description: String::new(),
            list_order: 0,
            uuid: uuid.into(),
        }
    }

    /// Attach both ends to features
    pub fn between_features(mut self, from_feature_id: RowId, to_feature_id: RowId) -> Self {
        self.from_feature_id = from_feature_id;
        self.to_feature_id = to_feature_id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_list_order(mut self, list_order: i32) -> Self {
        self.list_order = list_order;
        self
    }

    pub fn entity_id(&self) -> EntityId {
        EntityId::new(TableKind::Relationship, self.id)
    }
}
