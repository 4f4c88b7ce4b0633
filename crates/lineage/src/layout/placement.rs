//! Result of a layout run.

use indexmap::IndexMap;
use serde::Serialize;

use lineage_core::{diagnostic::Diagnostic, identifier::Id};

use crate::structure::{EntrySet, Node};

use super::positioner::RowAssignment;

/// Final row and effective interval of one entry.
///
/// Relationships are the validated ones: references dropped during
/// normalization do not appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    id: Id,
    row: usize,
    start: i64,
    end: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<Id>,
    #[serde(rename = "become", skip_serializing_if = "Option::is_none")]
    becomes: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    split: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge: Option<Id>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    links: Vec<Id>,
}

impl Placement {
    fn new(node: &Node, row: usize) -> Self {
        Self {
            id: node.id(),
            row,
            start: node.start(),
            end: node.end(),
            group: node.group(),
            becomes: node.becomes(),
            split: node.split(),
            merge: node.merge(),
            links: node.links().to_vec(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Zero-based row on the diagram.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    /// Effective end, explicit or derived.
    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn group(&self) -> Option<Id> {
        self.group
    }

    pub fn becomes(&self) -> Option<Id> {
        self.becomes
    }

    pub fn split(&self) -> Option<Id> {
        self.split
    }

    pub fn merge(&self) -> Option<Id> {
        self.merge
    }

    pub fn links(&self) -> &[Id] {
        &self.links
    }
}

/// Row assignment of a whole timeline.
///
/// Placements keep the input order of the entries they describe. The
/// diagnostics list every correction applied to the input before
/// positioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    start: i64,
    end: i64,
    row_count: usize,
    placements: IndexMap<Id, Placement>,
    diagnostics: Vec<Diagnostic>,
}

impl Layout {
    pub(crate) fn new(
        entries: &EntrySet,
        assignment: RowAssignment,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let placements = assignment
            .rows
            .into_iter()
            .map(|(id, row)| (id, Placement::new(entries.node(id), row)))
            .collect();

        Self {
            start: entries.start(),
            end: entries.end(),
            row_count: assignment.row_count,
            placements,
            diagnostics,
        }
    }

    /// Start of the time axis.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// End of the time axis.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of rows the diagram needs.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Placements in input order.
    pub fn placements(&self) -> impl ExactSizeIterator<Item = &Placement> {
        self.placements.values()
    }

    pub fn placement(&self, id: impl Into<Id>) -> Option<&Placement> {
        self.placements.get(&id.into())
    }

    /// Shorthand for the row of one entry.
    pub fn row_of(&self, id: impl Into<Id>) -> Option<usize> {
        self.placement(id).map(Placement::row)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
