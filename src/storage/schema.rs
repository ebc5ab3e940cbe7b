//! Database schema definitions
//!
//! Column order of these tables is relied upon by the row layouts in
//! `layout.rs`; reordering columns breaks every cursor.

/// SQL to create the classifiers table
pub const CREATE_CLASSIFIERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS classifiers (
    id INTEGER PRIMARY KEY ASC,
    main_type INTEGER NOT NULL,
    stereotype TEXT,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    x_order INTEGER NOT NULL DEFAULT 0,
    y_order INTEGER NOT NULL DEFAULT 0,
    list_order INTEGER NOT NULL DEFAULT 0,
    uuid TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the features table
pub const CREATE_FEATURES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS features (
    id INTEGER PRIMARY KEY ASC,
    main_type INTEGER NOT NULL,
    classifier_id INTEGER NOT NULL,
    key TEXT NOT NULL,
    value TEXT,
    description TEXT,
    list_order INTEGER NOT NULL DEFAULT 0,
    uuid TEXT NOT NULL UNIQUE,
    FOREIGN KEY(classifier_id) REFERENCES classifiers(id)
)
"#;

/// SQL to create the relationships table
/// Feature ends are NULL when the relationship attaches to the classifier itself
pub const CREATE_RELATIONSHIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS relationships (
    id INTEGER PRIMARY KEY ASC,
    main_type INTEGER NOT NULL,
    from_classifier_id INTEGER NOT NULL,
    to_classifier_id INTEGER NOT NULL,
    stereotype TEXT,
    name TEXT NOT NULL,
    description TEXT,
    list_order INTEGER NOT NULL DEFAULT 0,
    from_feature_id INTEGER DEFAULT NULL,
    to_feature_id INTEGER DEFAULT NULL,
    uuid TEXT NOT NULL UNIQUE,
    FOREIGN KEY(from_classifier_id) REFERENCES classifiers(id),
    FOREIGN KEY(to_classifier_id) REFERENCES classifiers(id),
    FOREIGN KEY(from_feature_id) REFERENCES features(id),
    FOREIGN KEY(to_feature_id) REFERENCES features(id)
)
"#;

/// SQL to create the diagrams table
pub const CREATE_DIAGRAMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS diagrams (
    id INTEGER PRIMARY KEY ASC,
    parent_id INTEGER DEFAULT NULL,
    diagram_type INTEGER NOT NULL,
    stereotype TEXT,
    name TEXT NOT NULL,
    description TEXT,
    list_order INTEGER NOT NULL DEFAULT 0,
    display_flags INTEGER NOT NULL DEFAULT 0,
    uuid TEXT NOT NULL UNIQUE,
    FOREIGN KEY(parent_id) REFERENCES diagrams(id)
)
"#;

/// SQL to create the diagramelements table
pub const CREATE_DIAGRAMELEMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS diagramelements (
    id INTEGER PRIMARY KEY ASC,
    diagram_id INTEGER NOT NULL,
    classifier_id INTEGER NOT NULL,
    display_flags INTEGER NOT NULL DEFAULT 0,
    focused_feature_id INTEGER DEFAULT NULL,
    uuid TEXT NOT NULL UNIQUE,
    FOREIGN KEY(diagram_id) REFERENCES diagrams(id),
    FOREIGN KEY(classifier_id) REFERENCES classifiers(id),
    FOREIGN KEY(focused_feature_id) REFERENCES features(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_features_classifier ON features(classifier_id)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_from ON relationships(from_classifier_id)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_to ON relationships(to_classifier_id)",
    "CREATE INDEX IF NOT EXISTS idx_diagrams_parent ON diagrams(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_diagramelements_diagram ON diagramelements(diagram_id)",
    "CREATE INDEX IF NOT EXISTS idx_diagramelements_classifier ON diagramelements(classifier_id)",
];

/// All table names, in an order that is safe for deletion
pub const TABLES: &[&str] = &[
    "diagramelements",
    "relationships",
    "features",
    "diagrams",
    "classifiers",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_CLASSIFIERS_TABLE,
        CREATE_FEATURES_TABLE,
        CREATE_RELATIONSHIPS_TABLE,
        CREATE_DIAGRAMS_TABLE,
        CREATE_DIAGRAMELEMENTS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
