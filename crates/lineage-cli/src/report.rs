//! TOML report of a finished layout.

use serde::Serialize;

use lineage::{Layout, Placement};

/// Serializable view of a [`Layout`].
///
/// Scalar fields come first so the report reads as a header followed by one
/// `[[placements]]` table per entry.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    row_count: usize,
    start: i64,
    end: i64,
    placements: Vec<&'a Placement>,
}

impl<'a> Report<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            row_count: layout.row_count(),
            start: layout.start(),
            end: layout.end(),
            placements: layout.placements().collect(),
        }
    }

    /// Renders the report as a TOML document.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
