//! Loading of included text and the context includes resolve against.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::diagnostics::Location;

/// Reads the full text behind a path.
pub trait SourceLoader: Send + Sync {
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Serves text from memory, keyed by path. Unknown paths are `NotFound`.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

/// The directory includes resolve against, and the name of the file being
/// processed when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeContext {
    pub base_dir: PathBuf,
    pub file_name: Option<String>,
}

impl IncludeContext {
    /// Context for in-memory text.
    pub fn for_text(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            file_name: None,
        }
    }

    /// Context for the file at `path`: its own directory and its name.
    pub fn for_file(path: &Path) -> Self {
        Self {
            base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        }
    }

    /// Resolves an include argument against the base directory.
    pub fn resolve(&self, include: &str) -> PathBuf {
        self.base_dir.join(include)
    }

    /// Location of `line` in the text this context describes.
    pub fn locate(&self, line: usize) -> Option<Location> {
        Location::locate(Some(line), &self.base_dir, self.file_name.as_deref())
    }

    /// The file path, if this context is a file.
    pub fn path(&self) -> Option<PathBuf> {
        self.file_name.as_ref().map(|name| self.base_dir.join(name))
    }
}
