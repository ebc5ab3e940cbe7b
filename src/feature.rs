//! Features - properties, operations, ports and lifelines of a classifier

use crate::id::{EntityId, RowId, TableKind};
use serde::{Deserialize, Serialize};

coded_kind! {
    /// Kind of a feature, persisted as `features.main_type`
    pub enum FeatureType {
        Property = 1 => "property",
        Operation = 2 => "operation",
        Port = 3 => "port",
        /// Representation of a classifier inside one scenario diagram
        Lifeline = 4 => "lifeline",
        ProvidedInterface = 5 => "provided_interface",
        RequiredInterface = 6 => "required_interface",
        InPortPin = 7 => "in_port_pin",
        OutPortPin = 8 => "out_port_pin",
        EntryPoint = 9 => "entry_point",
        ExitPoint = 10 => "exit_point",
        TaggedValue = 11 => "tagged_value",
    }
}

/// A feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: RowId,
    pub main_type: FeatureType,
    pub classifier_id: RowId,
    /// The feature's name
    pub key: String,
    /// Type or default value; empty if NULL
    pub value: String,
    pub description: String,
    pub list_order: i32,
    pub uuid: String,
}

impl Feature {
    pub fn new(
        main_type: FeatureType,
        classifier_id: RowId,
        key: impl Into<String>,
        uuid: impl Into<String>,
    ) -> Self {
        Self {
            id: RowId::VOID,
            main_type,
            classifier_id,
            key: key.into(),
            value: String::new(),
            description: String::new(),
            list_order: 0,
            uuid: uuid.into(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_list_order(mut self, list_order: i32) -> Self {
        self.list_order = list_order;
        self
    }

    pub fn entity_id(&self) -> EntityId {
        EntityId::new(TableKind::Feature, self.id)
    }
}
