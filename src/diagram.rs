//! Diagrams and diagram elements
//!
//! Diagrams form a tree via `parent_id` (void for root diagrams). A diagram
//! element places one classifier on one diagram; in scenario diagrams it also
//! names the lifeline feature that represents the classifier there.

use crate::id::{EntityId, RowId, TableKind};
use serde::{Deserialize, Serialize};

coded_kind! {
    /// Kind of a diagram, persisted as `diagrams.diagram_type`
    pub enum DiagramType {
        List = 0 => "list",
        Box = 1 => "box",
        BlockDefinition = 10 => "block_definition",
        InternalBlock = 11 => "internal_block",
        Parametric = 12 => "parametric",
        Requirement = 13 => "requirement",
        UseCase = 20 => "use_case",
        Activity = 21 => "activity",
        StateMachine = 22 => "state_machine",
        Sequence = 23 => "sequence",
        Communication = 24 => "communication",
        InteractionOverview = 25 => "interaction_overview",
        Timing = 26 => "timing",
        Deployment = 30 => "deployment",
        Component = 31 => "component",
        CompositeStructure = 32 => "composite_structure",
        Package = 33 => "package",
        Class = 34 => "class",
        Object = 35 => "object",
        Profile = 36 => "profile",
    }
}

/// A diagram row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub id: RowId,
    /// Void for root diagrams
    pub parent_id: RowId,
    pub diagram_type: DiagramType,
    pub stereotype: String,
    pub name: String,
    pub description: String,
    pub list_order: i32,
    pub display_flags: i64,
    pub uuid: String,
}

impl Diagram {
    pub fn new(diagram_type: DiagramType, name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            id: RowId::VOID,
            parent_id: RowId::VOID,
            diagram_type,
            stereotype: String::new(),
            name: name.into(),
            description: String::new(),
            list_order: 0,
            display_flags: 0,
            uuid: uuid.into(),
        }
    }

    pub fn with_parent(mut self, parent_id: RowId) -> Self {
        self.parent_id = parent_id;
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

    pub fn is_root(&self) -> bool {
        self.parent_id.is_void()
    }

    pub fn entity_id(&self) -> EntityId {
        EntityId::new(TableKind::Diagram, self.id)
    }
}

/// A diagram element row: one classifier shown on one diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramElement {
    pub id: RowId,
    pub diagram_id: RowId,
    pub classifier_id: RowId,
    pub display_flags: i64,
    /// The lifeline representing the classifier in a scenario; void otherwise
    pub focused_feature_id: RowId,
    pub uuid: String,
}

impl DiagramElement {
    pub fn new(diagram_id: RowId, classifier_id: RowId, uuid: impl Into<String>) -> Self {
        Self {
            id: RowId::VOID,
            diagram_id,
            classifier_id,
            display_flags: 0,
            focused_feature_id: RowId::VOID,
            uuid: uuid.into(),
        }
    }

    pub fn focused_on(mut self, feature_id: RowId) -> Self {
        self.focused_feature_id = feature_id;
        self
    }

    pub fn entity_id(&self) -> EntityId {
        EntityId::new(TableKind::DiagramElement, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_type_roundtrip() {
        for kind in DiagramType::all() {
            assert_eq!(DiagramType::from_code(kind.code()), Some(*kind));
            assert_eq!(kind.to_string().parse::<DiagramType>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_root_diagram() {
        let root = Diagram::new(DiagramType::List, "Overview", "u-d1");
        assert!(root.is_root());

        let child = Diagram::new(DiagramType::Class, "Detail", "u-d2").with_parent(RowId(1));
        assert!(!child.is_root());
    }

    #[test]
    fn test_element_focus() {
        let e = DiagramElement::new(RowId(1), RowId(2), "u-e");
        assert!(e.focused_feature_id.is_void());
        assert_eq!(e.focused_on(RowId(9)).focused_feature_id, RowId(9));
    }
}
