//! Validated entry set built from a [`Timeline`].
//!
//! The positioner never looks at raw input. [`EntrySet::from_timeline`]
//! drops duplicates and dangling references, straightens `become` chains,
//! derives missing ends and the axis bounds, and makes chain members agree on
//! group and manual row. Each correction is reported as a [`Diagnostic`];
//! none of them is fatal.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, warn};

use lineage_core::{
    diagnostic::{Diagnostic, DiagnosticCode, Diagnostics},
    entry::{Entry, Timeline},
    identifier::Id,
};

/// One entry after normalization.
///
/// Every reference held by a node names another node of the same set and
/// `start <= end` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    id: Id,
    start: i64,
    end: i64,
    row: Option<usize>,
    becomes: Option<Id>,
    split: Option<Id>,
    merge: Option<Id>,
    links: Vec<Id>,
    group: Option<Id>,
}

impl Node {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id(),
            start: entry.start(),
            end: entry.start(),
            row: entry.row(),
            becomes: entry.becomes(),
            split: entry.split(),
            merge: entry.merge(),
            links: entry.links().to_vec(),
            group: entry.group(),
        }
    }

    pub(crate) fn id(&self) -> Id {
        self.id
    }

    pub(crate) fn start(&self) -> i64 {
        self.start
    }

    /// Effective end, explicit or derived.
    pub(crate) fn end(&self) -> i64 {
        self.end
    }

    /// Manual row, shared by the whole `become` chain.
    pub(crate) fn row(&self) -> Option<usize> {
        self.row
    }

    pub(crate) fn becomes(&self) -> Option<Id> {
        self.becomes
    }

    pub(crate) fn split(&self) -> Option<Id> {
        self.split
    }

    pub(crate) fn merge(&self) -> Option<Id> {
        self.merge
    }

    pub(crate) fn links(&self) -> &[Id] {
        &self.links
    }

    pub(crate) fn group(&self) -> Option<Id> {
        self.group
    }
}

/// Normalized entries in input order, with the time-axis bounds.
#[derive(Debug, Clone)]
pub(crate) struct EntrySet {
    start: i64,
    end: i64,
    nodes: IndexMap<Id, Node>,
    predecessors: HashMap<Id, Id>,
}

impl EntrySet {
    /// Normalizes `timeline`, reporting every correction to `diagnostics`.
    pub(crate) fn from_timeline(timeline: &Timeline, diagnostics: &mut Diagnostics) -> Self {
        let (mut nodes, explicit_ends) = collect_nodes(timeline, diagnostics);
        drop_invalid_references(&mut nodes, diagnostics);
        let predecessors = straighten_chains(&mut nodes, diagnostics);

        let mut set = Self {
            start: 0,
            end: 0,
            nodes,
            predecessors,
        };
        set.resolve_intervals(timeline, &explicit_ends, diagnostics);
        set.reconcile_groups(diagnostics);
        set.reconcile_rows(diagnostics);

        debug!(
            entries = set.nodes.len(),
            start = set.start,
            end = set.end;
            "Timeline normalized"
        );
        set
    }

    /// Start of the time axis.
    pub(crate) fn start(&self) -> i64 {
        self.start
    }

    /// End of the time axis.
    pub(crate) fn end(&self) -> i64 {
        self.end
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes in input order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the set. References held by nodes are
    /// always valid.
    pub(crate) fn node(&self, id: Id) -> &Node {
        &self.nodes[&id]
    }

    /// The entry whose `become` points at `id`.
    pub(crate) fn predecessor(&self, id: Id) -> Option<Id> {
        self.predecessors.get(&id).copied()
    }

    /// Walks the `become` chain forward, starting with `id` itself.
    pub(crate) fn chain_from(&self, id: Id) -> impl Iterator<Item = &Node> {
        let mut next = Some(id);
        std::iter::from_fn(move || {
            let node = self.node(next?);
            next = node.becomes;
            Some(node)
        })
    }

    /// First entry of the chain containing `id`.
    pub(crate) fn chain_head(&self, id: Id) -> Id {
        let mut head = id;
        while let Some(previous) = self.predecessor(head) {
            head = previous;
        }
        head
    }

    /// All members of the chain containing `id`, head first.
    pub(crate) fn chain(&self, id: Id) -> Vec<Id> {
        self.chain_from(self.chain_head(id))
            .map(Node::id)
            .collect()
    }

    fn chain_heads(&self) -> Vec<Id> {
        self.nodes
            .keys()
            .copied()
            .filter(|id| !self.predecessors.contains_key(id))
            .collect()
    }

    /// Derives the axis and every effective end.
    fn resolve_intervals(
        &mut self,
        timeline: &Timeline,
        explicit_ends: &HashMap<Id, i64>,
        diagnostics: &mut Diagnostics,
    ) {
        let start = timeline
            .start()
            .or_else(|| self.nodes.values().map(|node| node.start).min())
            .unwrap_or(0);
        let end = timeline
            .end()
            .or_else(|| {
                self.nodes
                    .values()
                    .map(|node| explicit_ends.get(&node.id).map_or(node.start, |&end| end.max(node.start)))
                    .max()
            })
            .unwrap_or(start);
        if end < start {
            warn!(start, end; "Axis ends before it starts, collapsing it");
        }
        self.start = start;
        self.end = end.max(start);

        let ends: Vec<i64> = self
            .nodes
            .values()
            .map(|node| {
                explicit_ends
                    .get(&node.id)
                    .copied()
                    .or_else(|| node.becomes.map(|successor| self.nodes[&successor].start))
                    .unwrap_or(self.end)
            })
            .collect();

        let explicit_axis = timeline.start().is_some() || timeline.end().is_some();
        let (axis_start, axis_end) = (self.start, self.end);

        for (node, end) in self.nodes.values_mut().zip(ends) {
            node.end = end;
            if node.end < node.start {
                diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticCode::W007,
                        node.id,
                        format!(
                            "`{}` ends at {} before it starts at {}",
                            node.id, node.end, node.start
                        ),
                    )
                    .with_help("the entry is treated as a point at its start"),
                );
                node.end = node.start;
            }

            if explicit_axis && (node.start < axis_start || node.end > axis_end) {
                diagnostics.emit(Diagnostic::new(
                    DiagnosticCode::W008,
                    node.id,
                    format!(
                        "`{}` spans {}..{} outside the axis {}..{}",
                        node.id, node.start, node.end, axis_start, axis_end
                    ),
                ));
                node.start = node.start.clamp(axis_start, axis_end);
                node.end = node.end.clamp(node.start, axis_end);
            }
        }
    }

    /// Propagates each chain head's group to its successors.
    fn reconcile_groups(&mut self, diagnostics: &mut Diagnostics) {
        for head in self.chain_heads() {
            let group = self.nodes[&head].group;
            let mut previous = head;
            let mut next = self.nodes[&head].becomes;

            while let Some(id) = next {
                let node = &mut self.nodes[&id];
                if node.group != group {
                    diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticCode::W005,
                            id,
                            format!(
                                "`{id}` continues `{previous}` but is in {} instead of {}",
                                describe_group(node.group),
                                describe_group(group)
                            ),
                        )
                        .with_help(format!("`{id}` is moved to {}", describe_group(group))),
                    );
                    node.group = group;
                }
                previous = id;
                next = node.becomes;
            }
        }
    }

    /// Pins whole chains to the first manual row found in them.
    fn reconcile_rows(&mut self, diagnostics: &mut Diagnostics) {
        for head in self.chain_heads() {
            let chain = self.chain(head);
            let Some(row) = chain.iter().find_map(|id| self.nodes[id].row) else {
                continue;
            };

            for id in chain {
                let node = &mut self.nodes[&id];
                if let Some(declared) = node.row.filter(|&declared| declared != row) {
                    diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticCode::W006,
                            id,
                            format!("`{id}` asks for row {declared} but its chain is on row {row}"),
                        )
                        .with_help("members of a `become` chain always share one row"),
                    );
                }
                node.row = Some(row);
            }
        }
    }
}

/// Collects nodes in input order, dropping duplicate IDs.
fn collect_nodes(
    timeline: &Timeline,
    diagnostics: &mut Diagnostics,
) -> (IndexMap<Id, Node>, HashMap<Id, i64>) {
    let mut nodes = IndexMap::with_capacity(timeline.entries().len());
    let mut explicit_ends = HashMap::new();

    for entry in timeline.entries() {
        let id = entry.id();
        if nodes.contains_key(&id) {
            diagnostics.emit(
                Diagnostic::new(DiagnosticCode::W001, id, format!("duplicate entry `{id}`"))
                    .with_help("only the first entry with this ID is laid out"),
            );
            continue;
        }
        if let Some(end) = entry.end() {
            explicit_ends.insert(id, end);
        }
        nodes.insert(id, Node::from_entry(entry));
    }

    (nodes, explicit_ends)
}

/// Drops references to unknown entries and to the entry itself.
fn drop_invalid_references(nodes: &mut IndexMap<Id, Node>, diagnostics: &mut Diagnostics) {
    let known: HashSet<Id> = nodes.keys().copied().collect();

    for node in nodes.values_mut() {
        let id = node.id;
        let mut check = |relation: &str, target: Id| -> bool {
            if target == id {
                diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticCode::W003,
                        id,
                        format!("`{relation}` of `{id}` points at itself"),
                    )
                    .with_help("the relationship is ignored"),
                );
                false
            } else if !known.contains(&target) {
                diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticCode::W002,
                        id,
                        format!("`{relation}` of `{id}` names unknown entry `{target}`"),
                    )
                    .with_help("the relationship is ignored"),
                );
                false
            } else {
                true
            }
        };

        node.becomes = node.becomes.filter(|&target| check("become", target));
        node.split = node.split.filter(|&target| check("split", target));
        node.merge = node.merge.filter(|&target| check("merge", target));
        node.links.retain(|&target| check("links", target));
    }
}

/// Makes every `become` chain a simple path and returns the predecessor map.
///
/// A successor keeps its first predecessor in input order. On a cycle, the
/// first member in input order becomes the head and the link into it is cut.
fn straighten_chains(
    nodes: &mut IndexMap<Id, Node>,
    diagnostics: &mut Diagnostics,
) -> HashMap<Id, Id> {
    let ids: Vec<Id> = nodes.keys().copied().collect();
    let mut predecessors: HashMap<Id, Id> = HashMap::new();

    for &id in &ids {
        let Some(successor) = nodes[&id].becomes else {
            continue;
        };
        if let Some(&first) = predecessors.get(&successor) {
            diagnostics.emit(
                Diagnostic::new(
                    DiagnosticCode::W004,
                    id,
                    format!("`{successor}` already continues `{first}`"),
                )
                .with_help(format!("the `become` of `{id}` is ignored")),
            );
            nodes[&id].becomes = None;
            continue;
        }
        predecessors.insert(successor, id);
    }

    for &id in &ids {
        if !predecessors.contains_key(&id) || !on_cycle(nodes, id) {
            continue;
        }
        if let Some(closing) = predecessors.remove(&id) {
            diagnostics.emit(
                Diagnostic::new(
                    DiagnosticCode::W004,
                    closing,
                    format!("`become` of `{closing}` closes a cycle back to `{id}`"),
                )
                .with_help(format!("`{id}` starts the chain instead")),
            );
            nodes[&closing].becomes = None;
        }
    }

    predecessors
}

fn on_cycle(nodes: &IndexMap<Id, Node>, id: Id) -> bool {
    let mut current = id;
    for _ in 0..nodes.len() {
        match nodes[&current].becomes {
            Some(next) if next == id => return true,
            Some(next) => current = next,
            None => return false,
        }
    }
    false
}

fn describe_group(group: Option<Id>) -> String {
    match group {
        Some(group) => format!("group `{group}`"),
        None => "no group".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(timeline: &Timeline) -> (EntrySet, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let set = EntrySet::from_timeline(timeline, &mut diagnostics);
        (set, diagnostics)
    }

    #[test]
    fn test_empty_timeline() {
        let (set, diagnostics) = normalize(&Timeline::default());

        assert_eq!(set.len(), 0);
        assert_eq!(set.start(), 0);
        assert_eq!(set.end(), 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_axis_derived_from_entries() {
        let timeline = Timeline::new(vec![
            Entry::new("a", 1950).with_end(1960),
            Entry::new("b", 1940).with_end(1945),
            Entry::new("c", 1970),
        ]);

        let (set, diagnostics) = normalize(&timeline);

        assert_eq!(set.start(), 1940);
        assert_eq!(set.end(), 1970);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_end_derived_from_successor_then_axis() {
        let timeline = Timeline::new(vec![
            Entry::new("a", 1950).with_become("b"),
            Entry::new("b", 1960),
        ])
        .with_bounds(1900, 2000);

        let (set, _) = normalize(&timeline);

        assert_eq!(set.node(Id::new("a")).end(), 1960);
        assert_eq!(set.node(Id::new("b")).end(), 2000);
    }

    #[test]
    fn test_duplicate_entry_dropped() {
        let timeline = Timeline::new(vec![
            Entry::new("a", 1).with_end(2),
            Entry::new("a", 5).with_end(9),
        ]);

        let (set, diagnostics) = normalize(&timeline);

        assert_eq!(set.len(), 1);
        assert_eq!(set.node(Id::new("a")).start(), 1);
        assert!(diagnostics.contains(DiagnosticCode::W001));
    }

    #[test]
    fn test_unknown_references_dropped() {
        let timeline = Timeline::new(vec![
            Entry::new("a", 1)
                .with_end(5)
                .with_merge("nonexistent-id")
                .with_split("ghost")
                .with_become("phantom")
                .with_link("b")
                .with_link("nobody"),
            Entry::new("b", 1).with_end(5),
        ]);

        let (set, diagnostics) = normalize(&timeline);
        let a = set.node(Id::new("a"));

        assert_eq!(a.merge(), None);
        assert_eq!(a.split(), None);
        assert_eq!(a.becomes(), None);
        assert_eq!(a.links(), &[Id::new("b")]);
        assert_eq!(diagnostics.len(), 4);
        assert!(
            diagnostics
                .iter()
                .all(|diag| diag.code() == DiagnosticCode::W002 && diag.entry() == "a")
        );
    }

    #[test]
    fn test_self_references_dropped() {
        let timeline = Timeline::new(vec![Entry::new("a", 1).with_split("a").with_become("a")]);

        let (set, diagnostics) = normalize(&timeline);
        let a = set.node(Id::new("a"));

        assert_eq!(a.split(), None);
        assert_eq!(a.becomes(), None);
        assert!(diagnostics.contains(DiagnosticCode::W003));
    }

    #[test]
    fn test_second_predecessor_dropped() {
        let timeline = Timeline::new(vec![
            Entry::new("a", 1).with_become("c"),
            Entry::new("b", 1).with_become("c"),
            Entry::new("c", 5),
        ]);

        let (set, diagnostics) = normalize(&timeline);

        assert_eq!(set.node(Id::new("a")).becomes(), Some(Id::new("c")));
        assert_eq!(set.node(Id::new("b")).becomes(), None);
        assert_eq!(set.predecessor(Id::new("c")), Some(Id::new("a")));
        assert!(diagnostics.contains(DiagnosticCode::W004));
    }

    #[test]
    fn test_become_cycle_cut_at_first_member() {
        let timeline = Timeline::new(vec![
            Entry::new("a", 1).with_end(2).with_become("b"),
            Entry::new("b", 3).with_end(4).with_become("c"),
            Entry::new("c", 5).with_end(6).with_become("a"),
        ]);

        let (set, diagnostics) = normalize(&timeline);

        assert_eq!(set.predecessor(Id::new("a")), None);
        assert_eq!(set.node(Id::new("c")).becomes(), None);
        assert_eq!(set.chain(Id::new("b")), [Id::new("a"), Id::new("b"), Id::new("c")]);
        assert_eq!(
            diagnostics
                .iter()
                .filter(|diag| diag.code() == DiagnosticCode::W004)
                .count(),
            1
        );
    }

    #[test]
    fn test_chain_navigation() {
        let timeline = Timeline::new(vec![
            Entry::new("c", 20).with_end(30),
            Entry::new("a", 0).with_end(10).with_become("b"),
            Entry::new("b", 10).with_end(20).with_become("c"),
        ]);

        let (set, _) = normalize(&timeline);

        assert_eq!(set.chain_head(Id::new("c")), Id::new("a"));
        let forward: Vec<Id> = set.chain_from(Id::new("b")).map(Node::id).collect();
        assert_eq!(forward, [Id::new("b"), Id::new("c")]);
        assert_eq!(set.chain_from(Id::new("c")).count(), 1);
        assert_eq!(set.chain(Id::new("c")), [Id::new("a"), Id::new("b"), Id::new("c")]);
    }

    #[test]
    fn test_end_before_start_clamped() {
        let timeline = Timeline::new(vec![Entry::new("a", 10).with_end(5)]);

        let (set, diagnostics) = normalize(&timeline);

        assert_eq!(set.node(Id::new("a")).end(), 10);
        assert!(diagnostics.contains(DiagnosticCode::W007));
    }

    #[test]
    fn test_entry_outside_axis_clamped() {
        let timeline =
            Timeline::new(vec![Entry::new("a", 1940).with_end(2010)]).with_bounds(1950, 2000);

        let (set, diagnostics) = normalize(&timeline);
        let a = set.node(Id::new("a"));

        assert_eq!(a.start(), 1950);
        assert_eq!(a.end(), 2000);
        assert!(diagnostics.contains(DiagnosticCode::W008));
    }

    #[test]
    fn test_group_propagated_forward() {
        let timeline = Timeline::new(vec![
            Entry::new("a", 0).with_become("b").with_group("g1"),
            Entry::new("b", 10).with_become("c").with_group("g2"),
            Entry::new("c", 20),
        ]);

        let (set, diagnostics) = normalize(&timeline);

        assert_eq!(set.node(Id::new("b")).group(), Some(Id::new("g1")));
        assert_eq!(set.node(Id::new("c")).group(), Some(Id::new("g1")));
        assert_eq!(
            diagnostics
                .iter()
                .filter(|diag| diag.code() == DiagnosticCode::W005)
                .count(),
            2
        );
    }

    #[test]
    fn test_manual_row_shared_by_chain() {
        let timeline = Timeline::new(vec![
            Entry::new("a", 0).with_become("b"),
            Entry::new("b", 10).with_become("c").with_row(3),
            Entry::new("c", 20).with_row(5),
        ]);

        let (set, diagnostics) = normalize(&timeline);

        for id in ["a", "b", "c"] {
            assert_eq!(set.node(Id::new(id)).row(), Some(3));
        }
        assert!(diagnostics.contains(DiagnosticCode::W006));
    }
}
