//! CLI logic for the Lineage timeline layout tool.
//!
//! This module reads a TOML timeline, lays it out and writes the resulting
//! rows as a TOML report.

pub mod error_adapter;

mod args;
mod config;
mod report;

pub use args::Args;

use std::{fs, io};

use log::{info, warn};

use lineage::{LineageError, TimelineBuilder, diagnostic::Diagnostic, entry::Timeline};

use error_adapter::warnings_to_reportables;
use report::Report;

/// Run the Lineage CLI application
///
/// This function lays out the input timeline and writes the row report to
/// the output file. Advisory diagnostics are logged as warnings and do not
/// fail the run.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `LineageError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed input timelines
/// - Layout errors
pub fn run(args: &Args) -> Result<(), LineageError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing timeline"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let timeline = parse_timeline(&source)?;

    let builder = TimelineBuilder::new(app_config);
    let layout = builder.layout(&timeline)?;

    report_diagnostics(layout.diagnostics());

    let output = Report::new(&layout)
        .to_toml()
        .map_err(|err| LineageError::Io(io::Error::other(err.to_string())))?;
    fs::write(&args.output, output)?;

    info!(output_file = args.output, rows = layout.row_count(); "Layout report written");

    Ok(())
}

fn parse_timeline(source: &str) -> Result<Timeline, LineageError> {
    toml::from_str(source)
        .map_err(|err| LineageError::new_input_error(err.message(), err.span(), source))
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    let reporter = miette::GraphicalReportHandler::new();

    for reportable in warnings_to_reportables(diagnostics) {
        let mut writer = String::new();
        if reporter.render_report(&mut writer, &reportable).is_ok() {
            warn!("{writer}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeline() {
        let timeline = parse_timeline(
            r#"
            [[entries]]
            id = "a"
            start = 1
            "#,
        )
        .expect("valid timeline");

        assert_eq!(timeline.entries().len(), 1);
    }

    #[test]
    fn test_parse_timeline_reports_span() {
        let source = "[[entries]]\nid = \"a\"\nstart = \"soon\"\n";

        let err = parse_timeline(source).expect_err("start must be an integer");

        match err {
            LineageError::Input { span, src, .. } => {
                assert!(span.is_some());
                assert_eq!(src, source);
            }
            other => panic!("Expected input error, got {other:?}"),
        }
    }
}
