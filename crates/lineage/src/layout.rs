//! Row layout of a timeline.
//!
//! This module turns a normalized entry set into row assignments. It knows
//! nothing about pixels: the result is a [`Layout`] of integer rows that a
//! renderer maps to coordinates on its own.
//!
//! # Pipeline Position
//!
//! ```text
//! Timeline
//!     ↓ structure
//! EntrySet
//!     ↓ layout (this module)
//! Layout
//! ```
//!
//! # Submodules
//!
//! - `grid` - Occupancy grid of time-slots
//! - `positioner` - Single-pass row assignment
//! - `placement` - Public result types

mod grid;
mod placement;
mod positioner;
mod resolution;

pub use grid::{Grid, GridError};
pub use placement::{Layout, Placement};

use log::debug;
use thiserror::Error;

use lineage_core::{diagnostic::Diagnostics, entry::Timeline, identifier::Id};

use crate::{config::LayoutConfig, structure::EntrySet};

use positioner::Positioner;

/// Widest time axis, in slots, that a layout will allocate grids for.
pub const MAX_AXIS_WIDTH: usize = 1 << 20;

/// Fatal errors of the row-assignment pass.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("time axis {start}..={end} is wider than {limit} slots")]
    AxisTooWide { start: i64, end: i64, limit: usize },

    #[error("grid operation failed while placing `{entry}`: {source}")]
    Grid { entry: Id, source: GridError },

    #[error("entry `{entry}` was left without a row")]
    Unplaced { entry: Id },
}

/// Normalizes `timeline` and assigns a row to every entry.
pub(crate) fn lay_out(timeline: &Timeline, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    let mut diagnostics = Diagnostics::new();
    let entries = EntrySet::from_timeline(timeline, &mut diagnostics);

    for diagnostic in diagnostics.iter() {
        debug!(
            code = diagnostic.code().as_str(),
            entry = diagnostic.entry().to_string();
            "{}", diagnostic.message()
        );
    }

    let assignment = Positioner::new(&entries, config)?.run()?;

    Ok(Layout::new(&entries, assignment, diagnostics.into_vec()))
}
