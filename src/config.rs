//! Options for a `Preprocessor`.

/// How the engine joins output and how much it traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Joins the surviving lines of the result.
    pub line_delimiter: String,
    /// Emits `debug!` records for file entry/exit and the define set.
    pub debug: bool,
    /// How many includes may be nested inside one another.
    pub max_include_depth: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            line_delimiter: "\n".to_string(),
            debug: false,
            max_include_depth: 64,
        }
    }
}

impl ProcessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.line_delimiter = delimiter.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}
