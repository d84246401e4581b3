pub use crate::config::ProcessOptions;
pub use crate::defines::{DefineSet, DefinesError};
pub use crate::diagnostics::{
    DiagnosticSink, ErrorKind, Location, LogSink, PreprocessError, Warning, WarningBuffer,
    WarningKind,
};
pub use crate::engine::{process_file, process_text, Preprocessor, ProcessResult};
pub use crate::include::{FsLoader, IncludeContext, MemoryLoader, SourceLoader};

pub mod cli;
pub mod conditional;
pub mod config;
pub mod defines;
pub mod diagnostics;
pub mod directive;
pub mod engine;
pub mod include;
pub mod lines;
