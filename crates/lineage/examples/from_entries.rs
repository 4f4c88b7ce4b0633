//! Example: Laying out a timeline built in code
//!
//! This example builds a small family tree of operating systems with the
//! entry builder API and prints the row assigned to each entry.

use lineage::{
    TimelineBuilder,
    config::{AppConfig, LayoutConfig},
    entry::{Entry, Timeline},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building timeline from entries...\n");

    let timeline = Timeline::new(vec![
        Entry::new("unix", 1969).with_end(1977).with_become("bsd"),
        Entry::new("bsd", 1977).with_end(1995).with_group("bsd-family"),
        Entry::new("freebsd", 1993).with_split("bsd").with_group("bsd-family"),
        Entry::new("netbsd", 1993).with_split("bsd").with_group("bsd-family"),
        Entry::new("openbsd", 1995).with_split("netbsd").with_group("bsd-family"),
        Entry::new("minix", 1987).with_end(2005).with_link("unix"),
        Entry::new("linux", 1991).with_link("minix"),
        // Dropped with a warning: no entry is called "xenix".
        Entry::new("sco", 1989).with_end(2012).with_merge("xenix"),
    ])
    .with_bounds(1965, 2025);

    // Keep one free year on each side of every entry
    let config = AppConfig::new(LayoutConfig::new(1, true, true));
    let layout = TimelineBuilder::new(config).layout(&timeline)?;

    println!("Axis {}..{} on {} rows:", layout.start(), layout.end(), layout.row_count());
    for placement in layout.placements() {
        println!(
            "  row {:>2}  {:<8} {}..{}",
            placement.row(),
            placement.id(),
            placement.start(),
            placement.end()
        );
    }

    if !layout.diagnostics().is_empty() {
        println!("\nWarnings:");
        for diagnostic in layout.diagnostics() {
            println!("  {diagnostic}");
        }
    }

    Ok(())
}
