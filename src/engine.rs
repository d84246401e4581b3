//! The processing engine.
//!
//! A single cursor walks the line store left to right. Directives are
//! consumed as they are met: most remove their own line and leave the cursor
//! where it is, `#include` splices the processed file in place and jumps
//! past it, and an `#endif` closing a pruned block deletes the whole block and
//! rewinds the cursor to where the block began.
//!
//! The define set is shared by the whole include tree of one top-level call.
//! The conditional stack is local to each file, so a file cannot leave a block
//! open for its includer to close.

use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::conditional::{Closed, ConditionalStack};
use crate::config::ProcessOptions;
use crate::defines::DefineSet;
use crate::diagnostics::{
    DiagnosticSink, ErrorKind, LogSink, PreprocessError, Warning, WarningKind,
};
use crate::directive::{self, Directive};
use crate::include::{FsLoader, IncludeContext, SourceLoader};
use crate::lines::LineStore;

/// Result type for the engine.
pub type ProcessResult<T> = Result<T, PreprocessError>;

/// A configured engine. Holds no state between calls.
pub struct Preprocessor {
    options: ProcessOptions,
    loader: Box<dyn SourceLoader>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    /// Default options, file-system includes, warnings to the log.
    pub fn new() -> Self {
        Self {
            options: ProcessOptions::default(),
            loader: Box::new(FsLoader),
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Processes in-memory text. Includes resolve against `include_dir`.
    ///
    /// `defines` is copied; the caller's set is never modified.
    pub fn process_text(
        &self,
        text: &str,
        defines: &DefineSet,
        include_dir: impl AsRef<Path>,
    ) -> ProcessResult<String> {
        self.process_source(text, defines, &IncludeContext::for_text(include_dir.as_ref()))
    }

    /// Processes the file at `path`. Includes resolve against the file's own
    /// directory. The output equals `process_text` on the file's contents
    /// with that directory as base.
    pub fn process_file(&self, path: impl AsRef<Path>, defines: &DefineSet) -> ProcessResult<String> {
        let path = path.as_ref();
        let text = self.loader.load(path).map_err(|source| ErrorKind::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.process_source(&text, defines, &IncludeContext::for_file(path))
    }

    /// Processes text that was already loaded, in an explicit context.
    pub fn process_source(
        &self,
        text: &str,
        defines: &DefineSet,
        context: &IncludeContext,
    ) -> ProcessResult<String> {
        let mut defines = defines.clone();
        self.trace_enter(context);
        let lines = self.process_lines(
            LineStore::split_into_lines(text),
            &mut defines,
            context,
            0,
        )?;
        self.trace_exit(context);
        Ok(lines.join(&self.options.line_delimiter))
    }

    fn process_lines(
        &self,
        mut lines: LineStore,
        defines: &mut DefineSet,
        context: &IncludeContext,
        depth: usize,
    ) -> ProcessResult<LineStore> {
        if self.options.debug {
            debug!("defines: {:?}", defines.iter().collect::<Vec<_>>());
        }

        let mut conditionals = ConditionalStack::new();
        let mut cursor = 0;

        while cursor < lines.len() {
            let number = lines[cursor].number;
            let Some(directive) = directive::match_line(&lines[cursor].text) else {
                cursor += 1;
                continue;
            };
            let live = conditionals.is_live();

            match directive {
                Directive::Define(name) if live => {
                    defines.insert(name);
                    lines.remove(cursor);
                }
                Directive::Undefine(name) if live => {
                    defines.remove(&name);
                    lines.remove(cursor);
                }
                Directive::Include(include) if live => {
                    let included = self
                        .include(&include, defines, context, depth)
                        .map_err(|e| e.located(context.locate(number)))?;
                    lines.remove(cursor);
                    cursor += lines.insert_lines(cursor, included);
                }
                Directive::Warning(message) if live => {
                    self.warn(WarningKind::Directive { message }, context, number);
                    lines.remove(cursor);
                }
                Directive::Error(message) if live => {
                    return Err(PreprocessError::new(ErrorKind::ErrorDirective { message })
                        .located(context.locate(number)));
                }
                Directive::IfDef(name) => {
                    conditionals.open(cursor, number, defines.contains(&name));
                    lines.remove(cursor);
                }
                Directive::IfNDef(name) => {
                    conditionals.open(cursor, number, !defines.contains(&name));
                    lines.remove(cursor);
                }
                Directive::EndIf => match conditionals.close() {
                    Some(Closed::Live) => {
                        lines.remove(cursor);
                    }
                    Some(Closed::Excluded { start }) => {
                        lines.remove_range(start, cursor + 1);
                        cursor = start;
                    }
                    None => {
                        return Err(PreprocessError::new(ErrorKind::UnmatchedEndif)
                            .located(context.locate(number)));
                    }
                },
                Directive::Unknown(name) if live => {
                    self.warn(WarningKind::UnknownDirective { name }, context, number);
                    cursor += 1;
                }
                // pruned: kept until the enclosing #endif removes the block
                _ => cursor += 1,
            }
        }

        if let Some(first) = conditionals.first_unclosed() {
            let line = first.line;
            return Err(PreprocessError::new(ErrorKind::MissingEndif {
                count: conditionals.depth(),
            })
            .located(context.locate(line)));
        }

        Ok(lines)
    }

    fn include(
        &self,
        include: &str,
        defines: &mut DefineSet,
        context: &IncludeContext,
        depth: usize,
    ) -> ProcessResult<LineStore> {
        let path = context.resolve(include);
        if depth >= self.options.max_include_depth {
            return Err(ErrorKind::IncludeDepth {
                path,
                limit: self.options.max_include_depth,
            }
            .into());
        }
        let text = self
            .loader
            .load(&path)
            .map_err(|source| ErrorKind::IncludeRead {
                path: path.clone(),
                source,
            })?;

        let included = IncludeContext::for_file(&path);
        self.trace_enter(&included);
        let lines = self.process_lines(
            LineStore::split_into_lines(&text),
            defines,
            &included,
            depth + 1,
        )?;
        self.trace_exit(&included);
        Ok(lines)
    }

    fn warn(&self, kind: WarningKind, context: &IncludeContext, line: usize) {
        self.sink.emit(&Warning {
            kind,
            location: context.locate(line),
        });
    }

    fn trace_enter(&self, context: &IncludeContext) {
        if self.options.debug {
            if let Some(path) = context.path() {
                debug!("start of file: {}", path.display());
            }
        }
    }

    fn trace_exit(&self, context: &IncludeContext) {
        if self.options.debug {
            if let Some(path) = context.path() {
                debug!("end of file: {}", path.display());
            }
        }
    }
}

/// Processes `text` with default options. Includes resolve against `include_dir`.
pub fn process_text(
    text: &str,
    defines: &DefineSet,
    include_dir: impl AsRef<Path>,
) -> ProcessResult<String> {
    Preprocessor::new().process_text(text, defines, include_dir)
}

/// Processes the file at `path` with default options.
pub fn process_file(path: impl AsRef<Path>, defines: &DefineSet) -> ProcessResult<String> {
    Preprocessor::new().process_file(path, defines)
}
