//! Configuration types for Lineage layouts.
//!
//! All types implement [`serde::Deserialize`] so front ends can load them from
//! external sources. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`LayoutConfig`] - Knobs of the row-assignment pass.
//!
//! # Example
//!
//! ```
//! # use lineage::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().padding(), 1);
//! assert!(config.layout().compact_groups());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given layout section.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Settings of the row-assignment pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Free slots kept on each side of an entry on its row.
    padding: usize,

    /// Let consecutive groups share rows where their occupancy allows.
    compact_groups: bool,

    /// Move grouped entries toward split/merge partners in other groups.
    repair_cross_group_links: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 1,
            compact_groups: true,
            repair_cross_group_links: true,
        }
    }
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `padding` - Free slots kept around each entry.
    /// * `compact_groups` - Whether consecutive groups may share rows.
    /// * `repair_cross_group_links` - Whether cross-group split/merge partners are pulled together.
    pub fn new(padding: usize, compact_groups: bool, repair_cross_group_links: bool) -> Self {
        Self {
            padding,
            compact_groups,
            repair_cross_group_links,
        }
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn compact_groups(&self) -> bool {
        self.compact_groups
    }

    pub fn repair_cross_group_links(&self) -> bool {
        self.repair_cross_group_links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("empty config");

        assert_eq!(config.layout(), &LayoutConfig::default());
    }

    #[test]
    fn test_partial_layout_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            compact_groups = false
            "#,
        )
        .expect("valid config");

        assert_eq!(config.layout().padding(), 1);
        assert!(!config.layout().compact_groups());
        assert!(config.layout().repair_cross_group_links());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = toml::from_str::<AppConfig>(
            r#"
            [layout]
            padding = "wide"
            "#,
        );

        assert!(result.is_err());
    }
}
