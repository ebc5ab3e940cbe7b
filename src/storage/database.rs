//! SQLite database handle

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::classifier_reader::ClassifierReader;
use super::diagram_reader::DiagramReader;
use super::schema;
use crate::Result;

/// An open model database
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!("Opened database {}", path.display());
        let db = Self::configured(conn)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Open an existing database file without write access
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!("Opened database {} read-only", path.display());
        Self::configured(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self::configured(conn)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Foreign keys are enforced on every connection, whatever the SQLite build default
    fn configured(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Open a classifier reader over this database
    pub fn classifier_reader(&self) -> Result<ClassifierReader<'_>> {
        ClassifierReader::open(&self.conn)
    }

    /// Open a diagram reader over this database
    pub fn diagram_reader(&self) -> Result<DiagramReader<'_>> {
        DiagramReader::open(&self.conn)
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Row counts per table
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            classifiers: self.count("classifiers")?,
            features: self.count("features")?,
            relationships: self.count("relationships")?,
            diagrams: self.count("diagrams")?,
            diagram_elements: self.count("diagramelements")?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DbStats {
    pub classifiers: usize,
    pub features: usize,
    pub relationships: usize,
    pub diagrams: usize,
    pub diagram_elements: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Classifiers: {}", self.classifiers)?;
        writeln!(f, "  Features: {}", self.features)?;
        writeln!(f, "  Relationships: {}", self.relationships)?;
        writeln!(f, "  Diagrams: {}", self.diagrams)?;
        writeln!(f, "  Diagram elements: {}", self.diagram_elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, ClassifierType};
    use crate::diagram::{Diagram, DiagramElement, DiagramType};
    use crate::storage::test_support::*;

    #[test]
    fn test_stats() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection();
        let c = insert_classifier(conn, &Classifier::new(ClassifierType::Block, "Pump", "u-c"));
        let d = insert_diagram(conn, &Diagram::new(DiagramType::BlockDefinition, "Overview", "u-d"));
        insert_diagram_element(conn, &DiagramElement::new(d, c, "u-e"));

        let stats = db.stats().unwrap();
        assert_eq!(stats.classifiers, 1);
        assert_eq!(stats.features, 0);
        assert_eq!(stats.diagrams, 1);
        assert_eq!(stats.diagram_elements, 1);
        assert!(stats.to_string().contains("Classifiers: 1"));
    }

    #[test]
    fn test_foreign_keys_are_enforced() {
        let db = Database::open_in_memory().unwrap();
        let enabled: bool = db
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);

        let dangling = db.connection().execute(
            "INSERT INTO diagramelements (diagram_id, classifier_id, display_flags, uuid) VALUES (41, 42, 0, 'u-e')",
            [],
        );
        assert!(dangling.is_err());
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.db");
        {
            let db = Database::open(&path).unwrap();
            insert_classifier(db.connection(), &Classifier::new(ClassifierType::Class, "Car", "u-c"));
        }

        let db = Database::open_read_only(&path).unwrap();
        let reader = db.classifier_reader().unwrap();
        assert_eq!(reader.get_classifier_by_uuid("u-c").unwrap().name, "Car");
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.db");
        Database::open(&path).unwrap();
        let db = Database::open(&path).unwrap();
        assert_eq!(db.stats().unwrap().classifiers, 0);
    }
}
