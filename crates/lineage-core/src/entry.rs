//! Input model of a timeline diagram.
//!
//! A [`Timeline`] is an ordered list of [`Entry`] values plus optional bounds
//! of the time axis. Entries are plain data: relationships between them are
//! expressed through [`Id`] references that the layout engine validates and
//! resolves. Both types implement [`serde::Deserialize`], so front ends can
//! load them from any serde format.
//!
//! # Example
//!
//! ```
//! use lineage_core::entry::{Entry, Timeline};
//!
//! let timeline = Timeline::new(vec![
//!     Entry::new("unix", 1969).with_end(1990).with_become("bsd"),
//!     Entry::new("bsd", 1990).with_end(2000),
//!     Entry::new("minix", 1987).with_end(2000).with_split("unix"),
//! ])
//! .with_bounds(1960, 2010);
//!
//! assert_eq!(timeline.entries().len(), 3);
//! assert_eq!(timeline.start(), Some(1960));
//! ```

use serde::Deserialize;

use crate::identifier::Id;

/// A labeled time interval placed on the diagram.
///
/// `start` and `end` are positions on the shared time axis. `end` may be
/// left out, in which case the layout engine derives it: the `start` of the
/// entry's `become` successor, otherwise the end of the axis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    id: Id,
    start: i64,
    #[serde(default)]
    end: Option<i64>,

    /// Manual row override; never reassigned by the layout engine.
    #[serde(default)]
    row: Option<usize>,

    /// Successor continuing the same subject under another ID.
    #[serde(default, rename = "become")]
    becomes: Option<Id>,

    /// Source this entry branches from at its start.
    #[serde(default)]
    split: Option<Id>,

    /// Target this entry joins at its end.
    #[serde(default)]
    merge: Option<Id>,

    /// Loose associations, used only when drawing.
    #[serde(default)]
    links: Vec<Id>,

    #[serde(default)]
    group: Option<Id>,
}

impl Entry {
    /// Creates an entry starting at `start` with no end and no relationships.
    pub fn new(id: impl Into<Id>, start: i64) -> Self {
        Self {
            id: id.into(),
            start,
            end: None,
            row: None,
            becomes: None,
            split: None,
            merge: None,
            links: Vec::new(),
            group: None,
        }
    }

    pub fn with_end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_become(mut self, successor: impl Into<Id>) -> Self {
        self.becomes = Some(successor.into());
        self
    }

    pub fn with_split(mut self, source: impl Into<Id>) -> Self {
        self.split = Some(source.into());
        self
    }

    pub fn with_merge(mut self, target: impl Into<Id>) -> Self {
        self.merge = Some(target.into());
        self
    }

    /// Adds a loose association to another entry.
    pub fn with_link(mut self, other: impl Into<Id>) -> Self {
        self.links.push(other.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<Id>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    /// Returns the explicit end, if one was given.
    pub fn end(&self) -> Option<i64> {
        self.end
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Returns the `become` successor.
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

    pub fn group(&self) -> Option<Id> {
        self.group
    }
}

/// Ordered entries of one diagram together with its time-axis bounds.
///
/// Input order is significant: the layout engine scans entries in this order
/// and the same order always yields the same rows. Bounds left unset are
/// derived from the entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    start: Option<i64>,

    #[serde(default)]
    end: Option<i64>,

    #[serde(default)]
    entries: Vec<Entry>,
}

impl Timeline {
    /// Creates a timeline with derived axis bounds.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            start: None,
            end: None,
            entries,
        }
    }

    /// Sets explicit bounds of the time axis.
    pub fn with_bounds(mut self, start: i64, end: i64) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn start(&self) -> Option<i64> {
        self.start
    }

    pub fn end(&self) -> Option<i64> {
        self.end
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder() {
        let entry = Entry::new("netbsd", 1993)
            .with_end(2024)
            .with_split("386bsd")
            .with_merge("openbsd")
            .with_link("freebsd")
            .with_link("dragonfly")
            .with_group("bsd")
            .with_row(3);

        assert_eq!(entry.id(), "netbsd");
        assert_eq!(entry.start(), 1993);
        assert_eq!(entry.end(), Some(2024));
        assert_eq!(entry.row(), Some(3));
        assert_eq!(entry.split(), Some(Id::new("386bsd")));
        assert_eq!(entry.merge(), Some(Id::new("openbsd")));
        assert_eq!(entry.links(), &[Id::new("freebsd"), Id::new("dragonfly")]);
        assert_eq!(entry.group(), Some(Id::new("bsd")));
        assert_eq!(entry.becomes(), None);
    }

    #[test]
    fn test_entry_defaults() {
        let entry = Entry::new("plan9", 1992);

        assert_eq!(entry.end(), None);
        assert_eq!(entry.row(), None);
        assert!(entry.links().is_empty());
        assert_eq!(entry.group(), None);
    }

    #[test]
    fn test_timeline_bounds() {
        let timeline = Timeline::new(vec![Entry::new("a", 1)]);
        assert_eq!(timeline.start(), None);
        assert_eq!(timeline.end(), None);

        let timeline = timeline.with_bounds(0, 10);
        assert_eq!(timeline.start(), Some(0));
        assert_eq!(timeline.end(), Some(10));
    }

    #[test]
    fn test_deserialize_timeline() {
        let source = r#"
            start = 1950
            end = 2000

            [[entries]]
            id = "A"
            start = 1950
            end = 1960
            become = "B"
            group = "first"

            [[entries]]
            id = "B"
            start = 1960
            links = ["A"]
            row = 2
        "#;

        let timeline: Timeline = toml::from_str(source).expect("valid timeline");

        assert_eq!(timeline.start(), Some(1950));
        assert_eq!(timeline.end(), Some(2000));
        assert_eq!(timeline.entries().len(), 2);

        let a = &timeline.entries()[0];
        assert_eq!(a.becomes(), Some(Id::new("B")));
        assert_eq!(a.group(), Some(Id::new("first")));

        let b = &timeline.entries()[1];
        assert_eq!(b.end(), None);
        assert_eq!(b.row(), Some(2));
        assert_eq!(b.links(), &[Id::new("A")]);
    }

    #[test]
    fn test_deserialize_rejects_missing_start() {
        let source = r#"
            [[entries]]
            id = "A"
        "#;

        assert!(toml::from_str::<Timeline>(source).is_err());
    }
}
