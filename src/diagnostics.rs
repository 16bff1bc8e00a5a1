//! Diagnostics: severities, locations, and the accumulator a single
//! `load_module` call threads through the lexer/parser/resolver.
//!
//! Grounded on the teacher's `diagnostics::{Diagnostic, BuildDiagnostics,
//! DiagnosticLevel}` split, but located by `(line, column)` directly rather
//! than a byte offset plus a lazily built line table, since `CharSource`
//! (§4.1) already tracks line/column as it reads.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Warning, YangError};

/// Severity of a single diagnostic. Matches spec.md §6/§7 exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A location in a named source: 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub file: Option<PathBuf>,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: Option<PathBuf>, line: u32, column: u32) -> Self {
        SourceLocation { file, line, column }
    }

    pub fn unknown() -> Self {
        SourceLocation::default()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.file.as_deref().unwrap_or_else(|| Path::new("<unknown>"));
        write!(f, "{}:{}.{}", name.display(), self.line, self.column)
    }
}

/// A single diagnostic message, rendered in the stable format from spec.md §6:
/// `<severity>: <message> (<file>:<line>.<column>)`.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, location: SourceLocation) -> Self {
        Diagnostic { severity, message: message.into(), location }
    }

    pub fn error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(Severity::Error, message, location)
    }

    pub fn warning(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(Severity::Warning, message, location)
    }

    pub fn from_error(err: &YangError, location: SourceLocation) -> Self {
        Self::error(err.to_string(), location)
    }

    pub fn from_warning(warn: &Warning, location: SourceLocation) -> Self {
        Self::new(Severity::Warning, warn.to_string(), location)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.message, self.location)
    }
}

/// Accumulates every diagnostic produced while loading one module (and its
/// transitive imports/includes). Mirrors the teacher's `BuildDiagnostics`:
/// callers push diagnostics as they go rather than failing fast, so one pass
/// over a file can surface many errors (spec.md §7).
#[derive(Debug, Default, Clone)]
pub struct BuildDiagnostics {
    inner: Vec<Diagnostic>,
}

impl BuildDiagnostics {
    pub fn push(&mut self, diag: Diagnostic) {
        if diag.severity >= Severity::Warning {
            log::debug!("diagnostic: {diag}");
        }
        self.inner.push(diag);
    }

    pub fn push_error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.push(Diagnostic::error(message, location));
    }

    pub fn push_warning(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.push(Diagnostic::warning(message, location));
    }

    pub fn has_errors(&self) -> bool {
        self.inner.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.inner.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.inner
    }

    pub fn extend(&mut self, other: BuildDiagnostics) {
        self.inner.extend(other.inner);
    }
}

impl IntoIterator for BuildDiagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_display_format() {
        let loc = SourceLocation::new(Some(PathBuf::from("m.yang")), 3, 8);
        let d = Diagnostic::error("expected a string", loc);
        assert_eq!(d.to_string(), "error: expected a string (m.yang:3.8)");
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let mut diags = BuildDiagnostics::default();
        diags.push_warning("typedef-not-used", SourceLocation::unknown());
        assert!(!diags.has_errors());
        diags.push_error("def-not-found", SourceLocation::unknown());
        assert!(diags.has_errors());
    }
}
