//! The uprocess Command-Line Interface.
//!
//! A thin shell around the engine: it gathers the input text, the initial
//! defines and the include directory, runs one top-level invocation, and
//! writes the result.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, process};

use clap::Parser;
use miette::{Diagnostic, Report};
use thiserror::Error;

use crate::cli::args::UprocessArgs;
use crate::cli::output::{
    install_report_hook, print_error, print_notice, write_result, StderrSink,
};
use crate::config::ProcessOptions;
use crate::defines::{DefineSet, DefinesError};
use crate::diagnostics::PreprocessError;
use crate::engine::Preprocessor;
use crate::include::IncludeContext;

pub mod args;
pub mod output;

/// Failures of the shell itself, plus engine failures passed through.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("the file passed with -d, --defines ('{}') failed to open", .path.display())]
    #[diagnostic(code(uprocess::cli::defines_file))]
    DefinesFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the file passed with -d, --defines ('{}') does not contain valid defines", .path.display())]
    #[diagnostic(code(uprocess::cli::defines_file))]
    DefinesFileContent {
        path: PathBuf,
        #[source]
        source: DefinesError,
    },

    #[error("the value passed with -d, --defines is not valid defines JSON and is not an existing file")]
    #[diagnostic(
        code(uprocess::cli::defines),
        help("Pass a JSON object keyed by flag name, or the path of a file containing one.")
    )]
    Defines {
        #[source]
        source: DefinesError,
    },

    #[error("failed to read input '{}'", .path.display())]
    #[diagnostic(code(uprocess::cli::input))]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read stdin")]
    #[diagnostic(code(uprocess::cli::input))]
    ReadStdin {
        #[source]
        source: io::Error,
    },

    #[error("problems writing the output")]
    #[diagnostic(code(uprocess::cli::output))]
    WriteOutput {
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] PreprocessError),
}

/// The main entry point for the CLI.
pub fn run() {
    let args = UprocessArgs::parse();
    init_logging(args.debug);
    install_report_hook();

    if let Err(e) = execute(&args) {
        print_error(Report::new(e));
        process::exit(1);
    }
}

/// Runs one invocation described by `args`.
pub fn execute(args: &UprocessArgs) -> Result<(), CliError> {
    let defines = load_defines(args.defines.as_deref())?;
    let options = ProcessOptions::new()
        .with_line_delimiter(args.delimiter.clone())
        .with_debug(args.debug);
    let engine = Preprocessor::new()
        .with_options(options)
        .with_sink(Arc::new(StderrSink::new()));

    let processed = match (&args.file, &args.include_path) {
        (Some(file), include_path) => {
            let text = fs::read_to_string(file).map_err(|source| CliError::ReadInput {
                path: file.clone(),
                source,
            })?;
            match include_path {
                Some(include_path) => engine.process_text(&text, &defines, include_path)?,
                None => engine.process_source(&text, &defines, &IncludeContext::for_file(file))?,
            }
        }
        (None, include_path) => {
            let include_path = include_path.clone().unwrap_or_else(|| {
                print_notice("No include path given; resolving includes against the current directory.");
                PathBuf::from(".")
            });
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::ReadStdin { source })?;
            engine.process_text(&text, &defines, include_path)?
        }
    };

    write_result(&processed, args.output.as_deref())
        .map_err(|source| CliError::WriteOutput { source })
}

/// Parses `-d` as JSON first, then as the path of a JSON file.
pub fn load_defines(arg: Option<&str>) -> Result<DefineSet, CliError> {
    let Some(arg) = arg else {
        return Ok(DefineSet::new());
    };
    match DefineSet::from_json_str(arg) {
        Ok(defines) => Ok(defines),
        Err(DefinesError::Json(_)) if Path::new(arg).is_file() => load_defines_file(Path::new(arg)),
        Err(source) => Err(CliError::Defines { source }),
    }
}

fn load_defines_file(path: &Path) -> Result<DefineSet, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::DefinesFile {
        path: path.to_path_buf(),
        source,
    })?;
    DefineSet::from_json_str(&text).map_err(|source| CliError::DefinesFileContent {
        path: path.to_path_buf(),
        source,
    })
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}
