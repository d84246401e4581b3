//! Errors, warnings, and where they happened.
//!
//! Fatal conditions are a single `PreprocessError`: an `ErrorKind` plus a trail
//! of `Location` frames, innermost first. Each level of include recursion the
//! error passes through adds the location of its own include line, so a
//! failure deep in nested includes reads like a backtrace:
//!
//! ```text
//! #error: unsupported target
//! occurred while processing 'lib/target.js' line 3
//! occurred while processing 'main.js' line 12
//! ```
//!
//! Non-fatal diagnostics are `Warning`s, handed to a `DiagnosticSink`.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// LOCATIONS
// ============================================================================

/// Where a diagnostic occurred: a file (when known) and a 1-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
}

impl Location {
    /// Builds the location for `line` of `file_name` inside `base_dir`.
    ///
    /// Returns `None` when there is neither a file name nor a line number;
    /// in-memory text has no file name, so only its line is reported.
    pub fn locate(
        line: Option<usize>,
        base_dir: &Path,
        file_name: Option<&str>,
    ) -> Option<Self> {
        let file = file_name
            .filter(|name| !name.is_empty())
            .map(|name| base_dir.join(name));
        let line = line.filter(|&n| n > 0);
        if file.is_none() && line.is_none() {
            return None;
        }
        Some(Self { file, line })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "occurred while processing")?;
        if let Some(file) = &self.file {
            write!(f, " '{}'", file.display())?;
        }
        if let Some(line) = self.line {
            write!(f, " line {}", line)?;
        }
        Ok(())
    }
}

// ============================================================================
// FATAL ERRORS
// ============================================================================

/// What went wrong.
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("#error: {message}")]
    ErrorDirective { message: String },

    #[error("too many #endif expressions: no open #ifdef or #ifndef to close")]
    UnmatchedEndif,

    #[error("{count} missing #endif expression(s)")]
    MissingEndif { count: usize },

    #[error("failed to read '{}': {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read included file '{}': {source}", .path.display())]
    IncludeRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("include of '{}' exceeds the nesting limit of {limit}", .path.display())]
    IncludeDepth { path: PathBuf, limit: usize },
}

impl ErrorKind {
    fn code_suffix(&self) -> &'static str {
        match self {
            Self::ErrorDirective { .. } => "error_directive",
            Self::UnmatchedEndif => "unmatched_endif",
            Self::MissingEndif { .. } => "missing_endif",
            Self::SourceRead { .. } => "source_read",
            Self::IncludeRead { .. } => "include_read",
            Self::IncludeDepth { .. } => "include_depth",
        }
    }

    fn help(&self) -> Option<&'static str> {
        match self {
            Self::UnmatchedEndif => {
                Some("Remove the extra #endif or add the #ifdef/#ifndef it closes.")
            }
            Self::MissingEndif { .. } => {
                Some("Every #ifdef and #ifndef must be closed by an #endif in the same file.")
            }
            Self::IncludeRead { .. } => {
                Some("Include paths are resolved relative to the directory of the including file.")
            }
            Self::IncludeDepth { .. } => {
                Some("Check for a file that includes itself, directly or indirectly.")
            }
            Self::ErrorDirective { .. } | Self::SourceRead { .. } => None,
        }
    }
}

/// A fatal preprocessing failure with its location trail.
#[derive(Debug)]
pub struct PreprocessError {
    kind: ErrorKind,
    trail: Vec<Location>,
}

impl PreprocessError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            trail: Vec::new(),
        }
    }

    /// Appends the next outer frame to the trail, if there is one.
    pub fn located(mut self, location: Option<Location>) -> Self {
        if let Some(location) = location {
            self.trail.push(location);
        }
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Locations from the innermost (where the failure happened) outwards.
    pub fn trail(&self) -> &[Location] {
        &self.trail
    }
}

impl From<ErrorKind> for PreprocessError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for location in &self.trail {
            write!(f, "\n{}", location)?;
        }
        Ok(())
    }
}

impl std::error::Error for PreprocessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::SourceRead { source, .. } | ErrorKind::IncludeRead { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

impl Diagnostic for PreprocessError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("uprocess::{}", self.kind.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }
}

// ============================================================================
// WARNINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A live `#warning "message"`.
    Directive { message: String },
    /// A `// #word` that is not part of the grammar.
    UnknownDirective { name: String },
}

/// A non-fatal diagnostic. Never part of the output text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub location: Option<Location>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::Directive { message } => write!(f, "#warning: {}", message)?,
            WarningKind::UnknownDirective { name } => write!(f, "unknown directive #{}", name)?,
        }
        if let Some(location) = &self.location {
            write!(f, "\n{}", location)?;
        }
        Ok(())
    }
}

/// Receives warnings as the engine produces them.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, warning: &Warning);
}

/// Forwards warnings to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, warning: &Warning) {
        log::warn!("{}", warning);
    }
}

/// Collects warnings for later inspection.
#[derive(Debug, Default)]
pub struct WarningBuffer {
    warnings: Mutex<Vec<Warning>>,
}

impl WarningBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every warning collected so far.
    pub fn take(&self) -> Vec<Warning> {
        match self.warnings.lock() {
            Ok(mut warnings) => std::mem::take(&mut *warnings),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for WarningBuffer {
    fn emit(&self, warning: &Warning) {
        match self.warnings.lock() {
            Ok(mut warnings) => warnings.push(warning.clone()),
            Err(poisoned) => poisoned.into_inner().push(warning.clone()),
        }
    }
}
