//! Stable codes for advisory diagnostics.
//!
//! Every code names a recoverable problem in the input that the layout
//! engine corrects on its own before positioning entries.

use std::fmt;

/// Codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Duplicate entry.
    ///
    /// Two entries share one ID. The later one is dropped.
    W001,

    /// Unknown reference.
    ///
    /// A `become`, `split`, `merge` or `links` value names an entry that does
    /// not exist. The reference is dropped.
    W002,

    /// Self reference.
    ///
    /// A relationship points back at the entry that declares it. The
    /// reference is dropped.
    W003,

    /// Broken `become` chain.
    ///
    /// A successor is claimed by a second predecessor, or the `become` links
    /// form a cycle. The offending link is dropped.
    W004,

    /// Group mismatch.
    ///
    /// Members of one `become` chain declare different groups. The
    /// predecessor's group is propagated forward.
    W005,

    /// Conflicting manual rows.
    ///
    /// Members of one `become` chain declare different manual rows. The first
    /// manual row of the chain wins.
    W006,

    /// Invalid interval.
    ///
    /// An entry ends before it starts. Its end is moved to its start.
    W007,

    /// Entry outside the axis.
    ///
    /// An entry extends beyond explicit axis bounds and is clamped into them.
    W008,
}

impl DiagnosticCode {
    /// Returns the code as a string (e.g., "W001").
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::W001 => "W001",
            DiagnosticCode::W002 => "W002",
            DiagnosticCode::W003 => "W003",
            DiagnosticCode::W004 => "W004",
            DiagnosticCode::W005 => "W005",
            DiagnosticCode::W006 => "W006",
            DiagnosticCode::W007 => "W007",
            DiagnosticCode::W008 => "W008",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticCode::W001 => "duplicate entry",
            DiagnosticCode::W002 => "unknown reference",
            DiagnosticCode::W003 => "self reference",
            DiagnosticCode::W004 => "broken become chain",
            DiagnosticCode::W005 => "group mismatch",
            DiagnosticCode::W006 => "conflicting manual rows",
            DiagnosticCode::W007 => "invalid interval",
            DiagnosticCode::W008 => "entry outside axis",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
