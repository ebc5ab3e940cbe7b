//! Diagram reader - diagrams and diagram elements

use rusqlite::Connection;

use super::cursor::RowLayout;
use super::layout::{DiagramCursor, DiagramElementCursor, DiagramElementLayout, DiagramLayout};
use super::lending::BorrowedStatement;
use super::reader::{bound_slot, query_bounded_ids, query_cursor, query_single, Absence};
use super::statement::{finalize_all, Preparer, StatementHome};
use crate::diagram::{Diagram, DiagramElement};
use crate::id::RowId;
use crate::search::rows::DiagramHitLayout;
use crate::Result;

const READER: &str = "DiagramReader";

/// Read access to diagrams and the elements placed on them.
pub struct DiagramReader<'conn> {
    conn: &'conn Connection,
    diagram_by_id: StatementHome<'conn>,
    diagram_by_uuid: StatementHome<'conn>,
    diagrams_by_parent_id: StatementHome<'conn>,
    diagrams_by_classifier_id: StatementHome<'conn>,
    diagram_ids_by_parent_id: StatementHome<'conn>,
    diagram_ids_by_classifier_id: StatementHome<'conn>,
    diagramelement_by_id: StatementHome<'conn>,
    diagramelement_by_uuid: StatementHome<'conn>,
    diagramelements_by_diagram_id: StatementHome<'conn>,
    diagramelements_by_classifier_id: StatementHome<'conn>,
    diagrams_by_text: StatementHome<'conn>,
}

impl<'conn> DiagramReader<'conn> {
    pub fn open(conn: &'conn Connection) -> Result<Self> {
        let diagrams = DiagramLayout::COLUMNS;
        let elements = DiagramElementLayout::COLUMNS;

        let mut p = Preparer::new(conn);
        let reader = Self {
            conn,
            diagram_by_id: p.prepare(
                "diagram_by_id",
                &format!("SELECT {diagrams} FROM diagrams WHERE diagrams.id = ?1"),
            ),
            diagram_by_uuid: p.prepare(
                "diagram_by_uuid",
                &format!("SELECT {diagrams} FROM diagrams WHERE diagrams.uuid = ?1"),
            ),
            // IS matches NULL, so binding RowId::VOID selects the roots
            diagrams_by_parent_id: p.prepare(
                "diagrams_by_parent_id",
                &format!(
                    "SELECT {diagrams} FROM diagrams WHERE diagrams.parent_id IS ?1 \
                     ORDER BY diagrams.list_order ASC, diagrams.id ASC"
                ),
            ),
            diagrams_by_classifier_id: p.prepare(
                "diagrams_by_classifier_id",
                &format!(
                    "SELECT DISTINCT {diagrams} FROM diagrams \
                     INNER JOIN diagramelements ON diagramelements.diagram_id = diagrams.id \
                     WHERE diagramelements.classifier_id = ?1 \
                     ORDER BY diagrams.list_order ASC, diagrams.id ASC"
                ),
            ),
            diagram_ids_by_parent_id: p.prepare(
                "diagram_ids_by_parent_id",
                "SELECT diagrams.id FROM diagrams WHERE diagrams.parent_id IS ?1 \
                 ORDER BY diagrams.list_order ASC, diagrams.id ASC",
            ),
            diagram_ids_by_classifier_id: p.prepare(
                "diagram_ids_by_classifier_id",
                "SELECT DISTINCT diagrams.id, diagrams.list_order FROM diagrams \
                 INNER JOIN diagramelements ON diagramelements.diagram_id = diagrams.id \
                 WHERE diagramelements.classifier_id = ?1 \
                 ORDER BY diagrams.list_order ASC, diagrams.id ASC",
            ),
            diagramelement_by_id: p.prepare(
                "diagramelement_by_id",
                &format!("SELECT {elements} FROM diagramelements WHERE diagramelements.id = ?1"),
            ),
            diagramelement_by_uuid: p.prepare(
                "diagramelement_by_uuid",
                &format!("SELECT {elements} FROM diagramelements WHERE diagramelements.uuid = ?1"),
            ),
            diagramelements_by_diagram_id: p.prepare(
                "diagramelements_by_diagram_id",
                &format!(
                    "SELECT {elements} FROM diagramelements \
                     WHERE diagramelements.diagram_id = ?1 ORDER BY diagramelements.id ASC"
                ),
            ),
            diagramelements_by_classifier_id: p.prepare(
                "diagramelements_by_classifier_id",
                &format!(
                    "SELECT {elements} FROM diagramelements \
                     WHERE diagramelements.classifier_id = ?1 ORDER BY diagramelements.id ASC"
                ),
            ),
            diagrams_by_text: p.prepare(
                "diagrams_by_text",
                &format!(
                    "SELECT {hit} FROM diagrams \
                     WHERE diagrams.name LIKE ?1 ESCAPE '\\' \
                       OR diagrams.stereotype LIKE ?1 ESCAPE '\\' \
                       OR diagrams.description LIKE ?1 ESCAPE '\\' \
                     ORDER BY diagrams.id ASC",
                    hit = DiagramHitLayout::COLUMNS,
                ),
            ),
        };
        p.finish(READER)?;
        Ok(reader)
    }

    fn homes(&self) -> [&StatementHome<'conn>; 11] {
        [
            &self.diagram_by_id,
            &self.diagram_by_uuid,
            &self.diagrams_by_parent_id,
            &self.diagrams_by_classifier_id,
            &self.diagram_ids_by_parent_id,
            &self.diagram_ids_by_classifier_id,
            &self.diagramelement_by_id,
            &self.diagramelement_by_uuid,
            &self.diagramelements_by_diagram_id,
            &self.diagramelements_by_classifier_id,
            &self.diagrams_by_text,
        ]
    }

    /// Finalize all statements; `WrongState` while any is still lent out
    pub fn close(&self) -> Result<()> {
        finalize_all(READER, &self.homes())
    }

    pub fn has_borrowed_statements(&self) -> bool {
        self.homes().iter().any(|home| home.is_borrowed())
    }

    pub fn get_diagram_by_id(&self, id: RowId) -> Result<Diagram> {
        query_single::<DiagramLayout, _>(self.conn, &self.diagram_by_id, id, Absence::Structural)
    }

    pub fn get_diagram_by_uuid(&self, uuid: &str) -> Result<Diagram> {
        query_single::<DiagramLayout, _>(self.conn, &self.diagram_by_uuid, uuid, Absence::Expected)
    }

    /// Children of `parent_id`; `RowId::VOID` lists the root diagrams
    pub fn get_diagrams_by_parent_id(&self, parent_id: RowId) -> Result<DiagramCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.diagrams_by_parent_id, parent_id)
    }

    /// Diagrams showing a classifier, each once
    pub fn get_diagrams_by_classifier_id(&self, classifier_id: RowId) -> Result<DiagramCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.diagrams_by_classifier_id, classifier_id)
    }

    /// Ids of the children of `parent_id`, at most `max` of them.
    ///
    /// Fails with `ArrayBufferExceeded` if there are more; `out` then holds the first `max`.
    pub fn get_diagram_ids_by_parent_id(&self, parent_id: RowId, max: usize, out: &mut Vec<RowId>) -> Result<()> {
        query_bounded_ids(self.conn, &self.diagram_ids_by_parent_id, parent_id, max, out)
    }

    pub fn get_diagram_ids_by_classifier_id(
        &self,
        classifier_id: RowId,
        max: usize,
        out: &mut Vec<RowId>,
    ) -> Result<()> {
        query_bounded_ids(self.conn, &self.diagram_ids_by_classifier_id, classifier_id, max, out)
    }

    pub fn get_diagramelement_by_id(&self, id: RowId) -> Result<DiagramElement> {
        query_single::<DiagramElementLayout, _>(self.conn, &self.diagramelement_by_id, id, Absence::Structural)
    }

    pub fn get_diagramelement_by_uuid(&self, uuid: &str) -> Result<DiagramElement> {
        query_single::<DiagramElementLayout, _>(self.conn, &self.diagramelement_by_uuid, uuid, Absence::Expected)
    }

    pub fn get_diagramelements_by_diagram_id(&self, diagram_id: RowId) -> Result<DiagramElementCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.diagramelements_by_diagram_id, diagram_id)
    }

    pub fn get_diagramelements_by_classifier_id(
        &self,
        classifier_id: RowId,
    ) -> Result<DiagramElementCursor<'_, 'conn>> {
        query_cursor(self.conn, &self.diagramelements_by_classifier_id, classifier_id)
    }

    /// Lend the diagram text search with `pattern` (a LIKE pattern) bound
    pub fn search_diagrams(&self, pattern: &str) -> Result<BorrowedStatement<'_, 'conn>> {
        bound_slot(self.conn, &self.diagrams_by_text, pattern)
    }
}

impl std::fmt::Debug for DiagramReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(READER)
            .field("borrowed", &self.has_borrowed_statements())
            .finish()
    }
}
