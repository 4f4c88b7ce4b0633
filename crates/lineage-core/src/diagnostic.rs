//! Advisory diagnostics for timeline input.
//!
//! Problems such as a `merge` naming a missing entry never stop a layout.
//! They are corrected locally and reported as a [`Diagnostic`] carrying a
//! stable [`DiagnosticCode`], the affected entry, and optional help text.
//! A [`Diagnostics`] collector accumulates them over one layout pass.
//!
//! # Example
//!
//! ```
//! use lineage_core::{
//!     diagnostic::{Diagnostic, DiagnosticCode, Diagnostics},
//!     identifier::Id,
//! };
//!
//! let mut diagnostics = Diagnostics::new();
//! diagnostics.emit(
//!     Diagnostic::new(DiagnosticCode::W002, Id::new("linux"), "`merge` names unknown entry `minix2`")
//!         .with_help("the relationship is ignored"),
//! );
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(
//!     diagnostics.iter().next().unwrap().to_string(),
//!     "warning[W002]: `merge` names unknown entry `minix2`",
//! );
//! ```

mod code;

use std::fmt;

use crate::identifier::Id;

pub use code::DiagnosticCode;

/// A single advisory message about one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: DiagnosticCode,
    entry: Id,
    message: String,
    help: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic for `entry`.
    pub fn new(code: DiagnosticCode, entry: Id, message: impl Into<String>) -> Self {
        Self {
            code,
            entry,
            message: message.into(),
            help: None,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn code(&self) -> DiagnosticCode {
        self.code
    }

    /// Returns the entry the diagnostic is about.
    pub fn entry(&self) -> Id {
        self.entry
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning[{}]: {}", self.code, self.message)
    }
}

/// Collector for diagnostics raised during one layout pass.
///
/// Order of emission is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic to the collection.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Returns `true` if any collected diagnostic has the given code.
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.items.iter().any(|diagnostic| diagnostic.code == code)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
