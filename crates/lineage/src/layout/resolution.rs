//! Per-entry resolution records.
//!
//! The positioner never stores rows on the entries themselves. Each entry
//! gets a [`Resolution`] that tracks its master row, its group-local row and
//! how far its resolution has progressed. The progress state doubles as the
//! recursion guard: a target that is still [`ResolveState::Resolving`] is
//! part of a cycle.

use lineage_core::identifier::Id;

/// Progress of one entry's row resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ResolveState {
    #[default]
    Unresolved,
    Resolving,
    Resolved,
}

/// Grid a resolution runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// The master grid; rows are final.
    Master,
    /// The scratch grid of one group; rows are group-local.
    Group(Id),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Resolution {
    row: Option<usize>,
    group_row: Option<usize>,
    state: ResolveState,
}

impl Resolution {
    /// Creates a record, already resolved when a manual row is given.
    pub(crate) fn new(manual_row: Option<usize>) -> Self {
        Self {
            row: manual_row,
            group_row: None,
            state: if manual_row.is_some() {
                ResolveState::Resolved
            } else {
                ResolveState::Unresolved
            },
        }
    }

    pub(crate) fn row(&self) -> Option<usize> {
        self.row
    }

    pub(crate) fn group_row(&self) -> Option<usize> {
        self.group_row
    }

    pub(crate) fn state(&self) -> ResolveState {
        self.state
    }

    /// Row in the field that `scope` resolves.
    pub(crate) fn in_scope(&self, scope: Scope) -> Option<usize> {
        match scope {
            Scope::Master => self.row,
            Scope::Group(_) => self.group_row,
        }
    }

    pub(crate) fn begin(&mut self) {
        self.state = ResolveState::Resolving;
    }

    /// Records the row found in `scope` and marks the entry resolved.
    pub(crate) fn settle(&mut self, scope: Scope, row: usize) {
        match scope {
            Scope::Master => self.row = Some(row),
            Scope::Group(_) => self.group_row = Some(row),
        }
        self.state = ResolveState::Resolved;
    }

    /// Overwrites the master row, keeping the group-local one.
    pub(crate) fn place(&mut self, row: usize) {
        self.row = Some(row);
    }
}
