//! Handles all user-facing output for the CLI.
//!
//! Processed text goes to stdout or a file; warnings and errors go to
//! stderr, colored when stderr is a terminal.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::{DiagnosticSink, Warning};

// ============================================================================
// OUTPUT SINKS
// ============================================================================

/// StderrSink: prints warnings to stderr as they are produced.
pub struct StderrSink {
    choice: ColorChoice,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            choice: stderr_color_choice(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for StderrSink {
    fn emit(&self, warning: &Warning) {
        write_warning(self.choice, warning);
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Writes the processed text to `output`, or stdout when there is none.
pub fn write_result(text: &str, output: Option<&Path>) -> io::Result<()> {
    match output {
        Some(path) => fs::write(path, text),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(text.as_bytes())?;
            handle.flush()
        }
    }
}

/// Installs the miette report handler. Lines are not wrapped so that each
/// location of an error trail stays on one line.
pub fn install_report_hook() {
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().wrap_lines(false).build())
    }));
}

/// Prints a fatal error with its diagnostic code and help.
pub fn print_error(report: Report) {
    eprintln!("{:?}", report);
}

/// Prints a non-fatal CLI notice.
pub fn print_notice(message: &str) {
    write_warning(stderr_color_choice(), &message);
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn write_warning(choice: ColorChoice, message: &dyn fmt::Display) {
    let mut stderr = StandardStream::stderr(choice);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = write!(stderr, "warning");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {}", message);
}

fn stderr_color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
