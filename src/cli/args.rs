//! Defines the command-line arguments for the uprocess CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "uprocess",
    version,
    about = "Resolves comment-embedded #define, #ifdef and #include directives in a text file."
)]
pub struct UprocessArgs {
    /// The file to preprocess. Reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Defines used for the preprocessing. Either a JSON string or a JSON file.
    #[arg(short, long, value_name = "JSON|PATH")]
    pub defines: Option<String>,

    /// A file to write the output to instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// A directory to resolve includes against. Defaults to the directory of
    /// the input file.
    #[arg(short, long, value_name = "DIR")]
    pub include_path: Option<PathBuf>,

    /// The string used to join output lines.
    #[arg(long, default_value = "\n", hide_default_value = true)]
    pub delimiter: String,

    /// Trace file entry/exit and the define set.
    #[arg(long)]
    pub debug: bool,
}
