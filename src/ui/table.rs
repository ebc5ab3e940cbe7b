use tabled::{settings::Style, Table, Tabled};

use crate::classifier::Classifier;
use crate::diagram::{Diagram, DiagramElement};
use crate::feature::Feature;
use crate::relationship::Relationship;
use crate::search::SearchHit;
use crate::storage::DbStats;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// One listed entity
#[derive(Tabled)]
pub struct EntityRow {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Details")]
    pub details: String,
}

impl From<&Diagram> for EntityRow {
    fn from(d: &Diagram) -> Self {
        let details = if d.is_root() {
            "root".to_string()
        } else {
            format!("parent D{:04}", d.parent_id.0)
        };
        Self {
            id: d.entity_id().to_string(),
            kind: d.diagram_type.to_string(),
            name: d.name.clone(),
            details,
        }
    }
}

impl From<&Classifier> for EntityRow {
    fn from(c: &Classifier) -> Self {
        Self {
            id: c.entity_id().to_string(),
            kind: c.main_type.to_string(),
            name: c.name.clone(),
            details: stereotype(&c.stereotype),
        }
    }
}

impl From<&Feature> for EntityRow {
    fn from(f: &Feature) -> Self {
        Self {
            id: f.entity_id().to_string(),
            kind: f.main_type.to_string(),
            name: f.key.clone(),
            details: f.value.clone(),
        }
    }
}

impl From<&Relationship> for EntityRow {
    fn from(r: &Relationship) -> Self {
        Self {
            id: r.entity_id().to_string(),
            kind: r.main_type.to_string(),
            name: r.name.clone(),
            details: format!("C{:04} -> C{:04}", r.from_classifier_id.0, r.to_classifier_id.0),
        }
    }
}

impl From<&DiagramElement> for EntityRow {
    fn from(e: &DiagramElement) -> Self {
        let details = if e.focused_feature_id.is_void() {
            String::new()
        } else {
            format!("focus F{:04}", e.focused_feature_id.0)
        };
        Self {
            id: e.entity_id().to_string(),
            kind: "element".to_string(),
            name: format!("C{:04} on D{:04}", e.classifier_id.0, e.diagram_id.0),
            details,
        }
    }
}

impl From<&SearchHit> for EntityRow {
    fn from(hit: &SearchHit) -> Self {
        let details = match hit {
            SearchHit::Diagram { .. } => String::new(),
            _ => format!("on D{:04}", hit.diagram_id().0),
        };
        Self {
            id: hit.entity_id().to_string(),
            kind: hit.type_name().to_string(),
            name: hit.name().to_string(),
            details,
        }
    }
}

fn stereotype(s: &str) -> String {
    if s.is_empty() {
        String::new()
    } else {
        format!("«{s}»")
    }
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

/// Table of entities; empty string if there are none
pub fn entity_table(rows: &[EntityRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Classifiers", &stats.classifiers.to_string());
    builder.add_row("Features", &stats.features.to_string());
    builder.add_row("Relationships", &stats.relationships.to_string());
    builder.add_row("Diagrams", &stats.diagrams.to_string());
    builder.add_row("Diagram elements", &stats.diagram_elements.to_string());
    builder.build()
}
