//! Error types for Lineage operations.
//!
//! [`LineageError`] wraps every fatal condition of a layout run. Problems in
//! the input that can be corrected are not errors; they are reported as
//! diagnostics on the resulting layout.

use std::{io, ops::Range};

use thiserror::Error;

use crate::layout::LayoutError;

/// The main error type for Lineage operations.
///
/// # Diagnostic Variants
///
/// The `Input` variant keeps the offending source text and, when known, the
/// byte range of the problem, so front ends can point at it.
#[derive(Debug, Error)]
pub enum LineageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid input: {message}")]
    Input {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl LineageError {
    /// Create a new `Input` error with the associated source text.
    pub fn new_input_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Input {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}
