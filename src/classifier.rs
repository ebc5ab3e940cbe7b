//! Classifiers - the model elements that diagrams show
//!
//! A classifier is anything that can be placed on a diagram: blocks, classes,
//! actors, use cases, components, comments and so on. Features hang off a
//! classifier, relationships connect two classifiers.

use crate::id::{EntityId, RowId, TableKind};
use serde::{Deserialize, Serialize};

coded_kind! {
    /// Kind of a classifier, persisted as `classifiers.main_type`
    pub enum ClassifierType {
        Block = 200 => "block",
        ConstraintBlock = 201 => "constraint_block",
        Requirement = 202 => "requirement",
        Actor = 210 => "actor",
        UseCase = 211 => "use_case",
        SubsystemBoundary = 212 => "subsystem_boundary",
        Activity = 220 => "activity",
        State = 221 => "state",
        DiagramReference = 222 => "diagram_reference",
        Node = 230 => "node",
        Component = 231 => "component",
        Part = 232 => "part",
        Interface = 233 => "interface",
        Package = 234 => "package",
        Class = 235 => "class",
        Object = 236 => "object",
        Artifact = 237 => "artifact",
        Comment = 240 => "comment",
        Image = 241 => "image",
        /// Container of a sequence/communication/timing scenario
        Interaction = 250 => "interaction",
        Stereotype = 251 => "stereotype",
    }
}

/// A classifier row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    pub id: RowId,
    pub main_type: ClassifierType,
    /// Empty if the column is NULL
    pub stereotype: String,
    pub name: String,
    /// Empty if the column is NULL
    pub description: String,
    pub x_order: i32,
    pub y_order: i32,
    pub list_order: i32,
    pub uuid: String,
}

impl Classifier {
    /// Create a classifier that is not yet stored (id is void)
    pub fn new(main_type: ClassifierType, name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            id: RowId::VOID,
            main_type,
            stereotype: String::new(),
            name: name.into(),
            description: String::new(),
            x_order: 0,
            y_order: 0,
            list_order: 0,
            uuid: uuid.into(),
        }
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = stereotype.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_order(mut self, x_order: i32, y_order: i32, list_order: i32) -> Self {
        self.x_order = x_order;
        self.y_order = y_order;
        self.list_order = list_order;
        self
    }

    pub fn entity_id(&self) -> EntityId {
        EntityId::new(TableKind::Classifier, self.id)
    }
}
