//! Row assignment for a normalized entry set.
//!
//! The [`Positioner`] runs one deterministic pass over the entries:
//!
//! 1. Grouped entries are placed on the scratch grid of their group.
//! 2. Group grids are stacked onto the master grid, letting consecutive
//!    groups share rows where their occupancy does not collide.
//! 3. Every entry placed so far, including manual rows, blocks its span on
//!    the master grid.
//! 4. Grouped entries are pulled toward split/merge partners that live in
//!    another group.
//! 5. Ungrouped entries are placed on the master grid.
//!
//! Single-entry placement is recursive: an entry first resolves the entry it
//! splits from (or merges into) and then searches for room nearest to it.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace};

use lineage_core::identifier::Id;

use crate::{
    config::LayoutConfig,
    structure::{EntrySet, Node},
};

use super::{
    LayoutError, MAX_AXIS_WIDTH,
    grid::{Grid, span_end},
    resolution::{Resolution, ResolveState, Scope},
};

/// Final rows of every entry, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowAssignment {
    pub(crate) row_count: usize,
    pub(crate) rows: IndexMap<Id, usize>,
}

#[derive(Debug)]
struct GroupGrid {
    grid: Grid,
    offset: usize,
}

/// Assigns rows to the entries of one [`EntrySet`].
///
/// A positioner is single-use: [`Positioner::run`] consumes it.
#[derive(Debug)]
pub(crate) struct Positioner<'a> {
    entries: &'a EntrySet,
    compact_groups: bool,
    repair_links: bool,
    master: Grid,
    groups: IndexMap<Id, GroupGrid>,
    resolutions: HashMap<Id, Resolution>,
}

impl<'a> Positioner<'a> {
    /// Sets up the master grid and one scratch grid per group.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::AxisTooWide`] if the axis spans more than
    /// [`MAX_AXIS_WIDTH`] slots.
    pub(crate) fn new(entries: &'a EntrySet, config: &LayoutConfig) -> Result<Self, LayoutError> {
        let width = usize::try_from(entries.end().abs_diff(entries.start()))
            .ok()
            .and_then(|span| span.checked_add(1))
            .filter(|&width| width <= MAX_AXIS_WIDTH)
            .ok_or(LayoutError::AxisTooWide {
                start: entries.start(),
                end: entries.end(),
                limit: MAX_AXIS_WIDTH,
            })?;
        let mut master = Grid::with_padding(width, config.padding());
        let mut groups = IndexMap::new();
        let mut resolutions = HashMap::with_capacity(entries.len());

        for node in entries.iter() {
            match (node.row(), node.group()) {
                (Some(row), _) => master.grow_to(row),
                (None, Some(group)) => {
                    groups.entry(group).or_insert_with(|| GroupGrid {
                        grid: Grid::with_padding(width, config.padding()),
                        offset: 0,
                    });
                }
                (None, None) => {}
            }
            resolutions.insert(node.id(), Resolution::new(node.row()));
        }

        Ok(Self {
            entries,
            compact_groups: config.compact_groups(),
            repair_links: config.repair_cross_group_links(),
            master,
            groups,
            resolutions,
        })
    }

    /// Runs the full pass and returns the row of every entry.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if a grid operation touches a row that does
    /// not exist, or an entry ends up without a row.
    pub(crate) fn run(mut self) -> Result<RowAssignment, LayoutError> {
        let entries = self.entries;

        for node in entries.iter() {
            if let (Some(group), None) = (node.group(), node.row()) {
                self.resolve(node.id(), Scope::Group(group))?;
            }
        }

        self.stack_groups();
        self.reserve_placed()?;

        if self.repair_links {
            self.repair_cross_group_links()?;
        }

        for node in entries.iter().filter(|node| node.group().is_none()) {
            self.resolve(node.id(), Scope::Master)?;
        }

        let rows = entries
            .iter()
            .map(|node| {
                self.resolution(node.id())
                    .row()
                    .map(|row| (node.id(), row))
                    .ok_or(LayoutError::Unplaced { entry: node.id() })
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;

        debug!(rows = self.master.len(), groups = self.groups.len(); "Rows assigned");

        Ok(RowAssignment {
            row_count: self.master.len(),
            rows,
        })
    }

    /// Resolves the row of `id` in `scope`, placing its target first.
    fn resolve(&mut self, id: Id, scope: Scope) -> Result<usize, LayoutError> {
        if let Some(row) = self.resolution(id).in_scope(scope) {
            return Ok(row);
        }
        self.resolution_mut(id).begin();

        let near = match self.proximity_target(id, scope) {
            Some(target) if self.resolution(target).state() == ResolveState::Resolving => {
                debug!(
                    entry = id.to_string(),
                    target = target.to_string();
                    "Proximity cycle, placing without preference"
                );
                None
            }
            Some(target) => Some(self.resolve(target, scope)?),
            None => None,
        };

        // The target may have placed this entry through its `become` chain.
        if let Some(row) = self.resolution(id).in_scope(scope) {
            return Ok(row);
        }

        let (start, end) = self.line_span(id);
        let row = self.grid_mut(scope).find_space(start, end, near);
        trace!(entry = id.to_string(), row, near:?; "Entry placed");

        self.assign(id, row, scope)?;
        Ok(row)
    }

    /// Entry that `id` should be placed close to.
    ///
    /// The split source wins over the merge target. A merge target whose own
    /// split points back at `id` is skipped, the pair would otherwise wait on
    /// each other.
    fn proximity_target(&self, id: Id, scope: Scope) -> Option<Id> {
        let node = self.entries.node(id);
        let merge_target = node
            .merge()
            .filter(|&target| self.entries.node(target).split() != Some(id));
        let target = node.split().or(merge_target)?;

        match scope {
            Scope::Master => Some(target),
            Scope::Group(group) => {
                let target_node = self.entries.node(target);
                (target_node.group() == Some(group) && target_node.row().is_none())
                    .then_some(target)
            }
        }
    }

    /// Gives `id` and its forward `become` chain the row `row` in `scope`.
    fn assign(&mut self, id: Id, row: usize, scope: Scope) -> Result<(), LayoutError> {
        let entries = self.entries;

        self.resolution_mut(id).settle(scope, row);
        self.reserve(scope, entries.node(id), row)?;

        for member in entries.chain_from(id).skip(1) {
            let stale = self
                .resolution(member.id())
                .in_scope(scope)
                .filter(|&stale| stale != row);
            if let Some(stale) = stale {
                self.release(scope, member, stale)?;
            }
            self.resolution_mut(member.id()).settle(scope, row);
            self.reserve(scope, member, row)?;
        }

        Ok(())
    }

    /// Computes group offsets and turns group-local rows into master rows.
    fn stack_groups(&mut self) {
        let mut stack = Grid::with_padding(self.master.width(), 0);
        let mut previous_height = None;

        for (group, layout) in self.groups.iter_mut() {
            let height = layout.grid.len();
            let overlap = match previous_height {
                Some(previous) if self.compact_groups => Grid::max_overlap_within(
                    &stack,
                    &layout.grid,
                    height.min(previous).saturating_sub(1),
                ),
                _ => 0,
            };

            layout.offset = stack.len() - overlap;
            stack.overlay(&layout.grid, layout.offset);
            previous_height = Some(height);

            debug!(
                group = group.to_string(),
                offset = layout.offset,
                height,
                overlap;
                "Group stacked"
            );
        }

        let entries = self.entries;
        for node in entries.iter() {
            let (Some(group), Some(group_row)) =
                (node.group(), self.resolution(node.id()).group_row())
            else {
                continue;
            };
            let row = group_row + self.groups[&group].offset;
            self.resolution_mut(node.id()).place(row);
        }
    }

    /// Blocks every entry that already has a row on the master grid.
    fn reserve_placed(&mut self) -> Result<(), LayoutError> {
        if let Some(highest) = self.resolutions.values().filter_map(Resolution::row).max() {
            self.master.grow_to(highest);
        }

        let entries = self.entries;
        for node in entries.iter() {
            if let Some(row) = self.resolution(node.id()).row() {
                self.reserve(Scope::Master, node, row)?;
            }
        }

        Ok(())
    }

    fn repair_cross_group_links(&mut self) -> Result<(), LayoutError> {
        let entries = self.entries;

        for node in entries.iter() {
            let Some(group) = node.group() else {
                continue;
            };
            if node.row().is_some() {
                continue;
            }

            for target in [node.split(), node.merge()].into_iter().flatten() {
                if entries.node(target).group() != Some(group) {
                    let mut visited = HashSet::new();
                    self.pull_toward(node.id(), target, &mut visited)?;
                }
            }
        }

        Ok(())
    }

    /// Moves the chain of `id` as close to `target` as its group range allows.
    ///
    /// Same-group entries that split from or merge into a moved entry follow
    /// it. `visited` stops the propagation from revisiting an entry.
    fn pull_toward(
        &mut self,
        id: Id,
        target: Id,
        visited: &mut HashSet<Id>,
    ) -> Result<(), LayoutError> {
        if !visited.insert(id) {
            return Ok(());
        }

        let entries = self.entries;
        let (Some(group), Some(current), Some(target_row)) = (
            entries.node(id).group(),
            self.resolution(id).row(),
            self.resolution(target).row(),
        ) else {
            return Ok(());
        };
        let Some(layout) = self.groups.get(&group).filter(|layout| !layout.grid.is_empty())
        else {
            return Ok(());
        };

        let bound = target_row.clamp(layout.offset, layout.offset + layout.grid.len() - 1);
        if bound == current {
            return Ok(());
        }

        let (start, end) = self.line_span(entries.chain_head(id));
        let Some(row) = self.master.find_free_row_between(bound, current, start, end) else {
            trace!(entry = id.to_string(), bound, current; "No free row toward linked entry");
            return Ok(());
        };

        let chain = entries.chain(id);
        for &member in &chain {
            self.release(Scope::Master, entries.node(member), current)?;
        }
        for &member in &chain {
            self.reserve(Scope::Master, entries.node(member), row)?;
            self.resolution_mut(member).place(row);
        }

        debug!(
            entry = id.to_string(),
            target = target.to_string(),
            from = current,
            to = row;
            "Entry moved toward linked entry"
        );

        for other in entries.iter() {
            if other.group() != Some(group)
                || other.row().is_some()
                || chain.contains(&other.id())
            {
                continue;
            }
            for source in [other.split(), other.merge()].into_iter().flatten() {
                if chain.contains(&source) {
                    self.pull_toward(other.id(), source, visited)?;
                }
            }
        }

        Ok(())
    }

    fn reserve(&mut self, scope: Scope, node: &Node, row: usize) -> Result<(), LayoutError> {
        let (start, end) = self.span(node);
        self.grid_mut(scope)
            .reserve(row, start, end)
            .map_err(|source| LayoutError::Grid {
                entry: node.id(),
                source,
            })
    }

    fn release(&mut self, scope: Scope, node: &Node, row: usize) -> Result<(), LayoutError> {
        let (start, end) = self.span(node);
        self.grid_mut(scope)
            .release(row, start, end)
            .map_err(|source| LayoutError::Grid {
                entry: node.id(),
                source,
            })
    }

    fn grid_mut(&mut self, scope: Scope) -> &mut Grid {
        match scope {
            Scope::Master => &mut self.master,
            Scope::Group(group) => &mut self.groups[&group].grid,
        }
    }

    fn resolution(&self, id: Id) -> Resolution {
        self.resolutions.get(&id).copied().unwrap_or_default()
    }

    fn resolution_mut(&mut self, id: Id) -> &mut Resolution {
        self.resolutions.entry(id).or_default()
    }

    /// Slot span of one entry.
    fn span(&self, node: &Node) -> (usize, usize) {
        (self.slot(node.start()), self.slot(node.end()))
    }

    /// Smallest slot span covering `id` and every member of its forward chain.
    ///
    /// Members may start before or end after their predecessor, and a point
    /// member still takes its one slot.
    fn line_span(&self, id: Id) -> (usize, usize) {
        self.entries
            .chain_from(id)
            .map(|member| self.span(member))
            .fold((usize::MAX, 0), |(start, end), (member_start, member_end)| {
                (
                    start.min(member_start),
                    end.max(span_end(member_start, member_end)),
                )
            })
    }

    fn slot(&self, time: i64) -> usize {
        slot_offset(self.entries.start(), time)
    }
}

fn slot_offset(origin: i64, time: i64) -> usize {
    usize::try_from(time.saturating_sub(origin)).unwrap_or(0)
}
