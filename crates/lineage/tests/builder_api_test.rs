//! Integration tests for the TimelineBuilder API
//!
//! These tests verify that the public API works and is usable.

use lineage::{
    LayoutError, LineageError, TimelineBuilder,
    config::{AppConfig, LayoutConfig},
    diagnostic::DiagnosticCode,
    entry::{Entry, Timeline},
};

#[test]
fn test_builder_api_exists() {
    let _builder = TimelineBuilder::default();
}

#[test]
fn test_empty_timeline() {
    let layout = TimelineBuilder::default()
        .layout(&Timeline::default())
        .expect("Failed to lay out empty timeline");

    assert_eq!(layout.row_count(), 0);
    assert_eq!(layout.placements().len(), 0);
    assert!(layout.diagnostics().is_empty());
}

#[test]
fn test_overlapping_entries_use_different_rows() {
    let timeline = Timeline::new(vec![
        Entry::new("A", 1950).with_end(1960),
        Entry::new("B", 1955).with_end(1965),
    ]);

    let layout = TimelineBuilder::default()
        .layout(&timeline)
        .expect("Failed to lay out timeline");

    assert_ne!(layout.row_of("A"), layout.row_of("B"));
}

#[test]
fn test_become_keeps_row() {
    let timeline = Timeline::new(vec![
        Entry::new("A", 1950).with_end(1960).with_become("B"),
        Entry::new("B", 1960).with_end(1970),
    ]);

    let layout = TimelineBuilder::default()
        .layout(&timeline)
        .expect("Failed to lay out timeline");

    assert_eq!(layout.row_of("A"), layout.row_of("B"));
}

#[test]
fn test_split_stays_near_source() {
    let timeline = Timeline::new(vec![
        Entry::new("A", 1950).with_end(2000),
        Entry::new("C", 1980).with_split("A"),
    ]);

    let layout = TimelineBuilder::default()
        .layout(&timeline)
        .expect("Failed to lay out timeline");

    let a = layout.row_of("A").expect("A placed");
    let c = layout.row_of("C").expect("C placed");
    assert!(a.abs_diff(c) <= 1, "C on row {c} is far from A on row {a}");

    let c = layout.placement("C").expect("C placed");
    assert_eq!(c.end(), 2000, "Open end should run to the axis end");
}

#[test]
fn test_groups_share_a_row() {
    let timeline = Timeline::new(vec![
        Entry::new("g1-a", 1900).with_end(1920).with_group("group1"),
        Entry::new("g1-b", 1900).with_end(1920).with_group("group1"),
        Entry::new("g1-c", 1900).with_end(1920).with_group("group1"),
        Entry::new("g2-a", 1960).with_end(1980).with_group("group2"),
        Entry::new("g2-b", 1960).with_end(1980).with_group("group2"),
    ]);

    let layout = TimelineBuilder::default()
        .layout(&timeline)
        .expect("Failed to lay out timeline");

    assert_eq!(layout.row_count(), 4);
}

#[test]
fn test_invalid_reference_is_a_warning() {
    let timeline = Timeline::new(vec![
        Entry::new("A", 1950).with_end(1960),
        Entry::new("B", 1950).with_end(1960).with_merge("nonexistent-id"),
    ]);

    let result = TimelineBuilder::default().layout(&timeline);
    let layout = result.expect("Invalid references must not fail the layout");

    assert_eq!(layout.diagnostics().len(), 1);
    let diagnostic = &layout.diagnostics()[0];
    assert_eq!(diagnostic.code(), DiagnosticCode::W002);
    assert_eq!(diagnostic.entry(), "B");

    let b = layout.placement("B").expect("B placed");
    assert_eq!(b.merge(), None);
    assert_ne!(layout.row_of("A"), layout.row_of("B"));
}

#[test]
fn test_placements_keep_input_order() {
    let timeline = Timeline::new(vec![
        Entry::new("z", 3).with_end(4),
        Entry::new("a", 1).with_end(2),
        Entry::new("m", 2).with_end(3),
    ]);

    let layout = TimelineBuilder::default()
        .layout(&timeline)
        .expect("Failed to lay out timeline");

    let ids: Vec<String> = layout.placements().map(|p| p.id().to_string()).collect();
    assert_eq!(ids, ["z", "a", "m"]);
    assert_eq!(layout.start(), 1);
    assert_eq!(layout.end(), 4);
}

#[test]
fn test_builder_with_config() {
    let timeline = Timeline::new(vec![
        Entry::new("A", 0).with_end(10),
        Entry::new("B", 10).with_end(20),
    ]);

    let tight = TimelineBuilder::new(AppConfig::new(LayoutConfig::new(0, true, true)))
        .layout(&timeline)
        .expect("Failed to lay out timeline");
    assert_eq!(tight.row_count(), 1);

    let padded = TimelineBuilder::new(AppConfig::default())
        .layout(&timeline)
        .expect("Failed to lay out timeline");
    assert_eq!(padded.row_count(), 2);
}

#[test]
fn test_builder_reusability() {
    let first = Timeline::new(vec![Entry::new("A", 0).with_end(10)]);
    let second = Timeline::new(vec![
        Entry::new("B", 0).with_end(10),
        Entry::new("C", 5).with_end(15),
    ]);

    let builder = TimelineBuilder::default();

    let layout1 = builder.layout(&first).expect("Failed to lay out first");
    let layout2 = builder.layout(&second).expect("Failed to lay out second");
    let layout1_again = builder.layout(&first).expect("Failed to lay out first again");

    assert_eq!(layout1.row_count(), 1);
    assert_eq!(layout2.row_count(), 2);
    assert_eq!(layout1, layout1_again);
}

#[test]
fn test_layout_from_toml() {
    let source = r#"
        start = 1960
        end = 2020

        [[entries]]
        id = "unix"
        start = 1969
        become = "bsd"

        [[entries]]
        id = "bsd"
        start = 1977
        end = 1995
        group = "bsd-family"

        [[entries]]
        id = "freebsd"
        start = 1993
        split = "bsd"
        group = "bsd-family"

        [[entries]]
        id = "linux"
        start = 1991
        row = 6
    "#;
    let timeline: Timeline = toml::from_str(source).expect("Failed to parse timeline");

    let layout = TimelineBuilder::default()
        .layout(&timeline)
        .expect("Failed to lay out timeline");

    assert_eq!(layout.row_of("unix"), layout.row_of("bsd"));
    assert_eq!(layout.row_of("linux"), Some(6));
    assert_eq!(layout.row_count(), 7);

    let unix = layout.placement("unix").expect("unix placed");
    assert_eq!(unix.end(), 1977);

    let bsd = layout.placement("bsd").expect("bsd placed");
    assert_eq!(bsd.group(), None, "Chain members take the group of their head");
    assert!(
        layout
            .diagnostics()
            .iter()
            .any(|diag| diag.code() == DiagnosticCode::W005)
    );
}

#[test]
fn test_wide_axis_is_an_error() {
    let timeline = Timeline::new(vec![Entry::new("A", 0).with_end(i64::MAX)]);

    let result = TimelineBuilder::default().layout(&timeline);

    assert!(matches!(
        result,
        Err(LineageError::Layout(LayoutError::AxisTooWide { .. }))
    ));
}

#[test]
fn test_epoch_seconds_axis_is_an_error() {
    let timeline = Timeline::new(vec![
        Entry::new("A", 0).with_end(1_700_000_000),
        Entry::new("B", 1_600_000_000),
    ]);

    let result = TimelineBuilder::default().layout(&timeline);

    assert!(matches!(result, Err(LineageError::Layout(_))));
}
