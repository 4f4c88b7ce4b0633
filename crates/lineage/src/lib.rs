//! Lineage - A row-assignment layout engine for timeline diagrams.
//!
//! Entries are labeled time intervals that may continue one another
//! (`become`), branch off (`split`), join (`merge`) or belong to a group.
//! Lineage assigns every entry an integer row so that overlapping entries do
//! not collide, related entries stay close and groups stay together. Drawing
//! is left to the caller.

pub mod config;
pub mod layout;

mod error;
mod structure;

pub use lineage_core::{diagnostic, entry, identifier};

pub use error::LineageError;
pub use layout::{Grid, GridError, Layout, LayoutError, Placement};

use log::{debug, info, trace};

use config::AppConfig;
use entry::Timeline;

/// Builder for laying out Lineage timelines.
///
/// The builder holds only configuration, so one instance can lay out any
/// number of timelines.
///
/// # Examples
///
/// ```rust
/// use lineage::{
///     TimelineBuilder,
///     config::AppConfig,
///     entry::{Entry, Timeline},
/// };
///
/// let timeline = Timeline::new(vec![
///     Entry::new("unix", 1969).with_end(1991).with_become("bsd"),
///     Entry::new("bsd", 1991).with_end(2000),
///     Entry::new("linux", 1991).with_end(2000),
/// ]);
///
/// let builder = TimelineBuilder::new(AppConfig::default());
/// let layout = builder.layout(&timeline).expect("Failed to lay out");
///
/// assert_eq!(layout.row_of("unix"), layout.row_of("bsd"));
/// assert_ne!(layout.row_of("bsd"), layout.row_of("linux"));
///
/// // Or use default config
/// let builder = TimelineBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    config: AppConfig,
}

impl TimelineBuilder {
    /// Create a new timeline builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Assign a row to every entry of `timeline`.
    ///
    /// Problems in the input such as unknown references or broken `become`
    /// chains are corrected and reported through [`Layout::diagnostics`]
    /// instead of failing the call.
    ///
    /// # Errors
    ///
    /// Returns `LineageError::Layout` if the time axis is wider than
    /// [`layout::MAX_AXIS_WIDTH`] slots, or if the row assignment reaches an
    /// inconsistent grid state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lineage::{
    ///     TimelineBuilder,
    ///     diagnostic::DiagnosticCode,
    ///     entry::{Entry, Timeline},
    /// };
    ///
    /// let timeline = Timeline::new(vec![
    ///     Entry::new("minix", 1987).with_end(2005).with_merge("nonexistent-id"),
    /// ]);
    ///
    /// let layout = TimelineBuilder::default()
    ///     .layout(&timeline)
    ///     .expect("Failed to lay out timeline");
    ///
    /// assert_eq!(layout.diagnostics()[0].code(), DiagnosticCode::W002);
    /// assert_eq!(layout.row_of("minix"), Some(0));
    /// ```
    pub fn layout(&self, timeline: &Timeline) -> Result<Layout, LineageError> {
        info!(entries = timeline.entries().len(); "Laying out timeline");
        trace!(config:? = self.config; "Layout configuration");

        let layout = layout::lay_out(timeline, self.config.layout())?;

        debug!(
            start = layout.start(),
            end = layout.end(),
            diagnostics = layout.diagnostics().len();
            "Axis resolved"
        );
        info!(rows = layout.row_count(); "Timeline laid out");

        Ok(layout)
    }
}
