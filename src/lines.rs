//! The mutable line sequence the engine walks.
//!
//! `LineStore` has no cursor of its own. Callers that mutate at or before
//! their cursor adjust it themselves.

use std::ops::Index;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n|\r|\n").unwrap();
}

/// A single line of text and its 1-based line number in the text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

/// An ordered, growable sequence of lines in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `text` at `\r\n`, `\r` or `\n`. Every break counts once, so
    /// blank lines and a trailing newline are kept as empty lines.
    pub fn split_into_lines(text: &str) -> Self {
        let lines = LINE_BREAK
            .split(text)
            .enumerate()
            .map(|(i, text)| Line {
                number: i + 1,
                text: text.to_string(),
            })
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Removes the line at `index`, shifting later lines up by one.
    pub fn remove(&mut self, index: usize) -> Line {
        self.lines.remove(index)
    }

    /// Removes lines `start..end`, shifting later lines up.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        self.lines.drain(start..end);
    }

    /// Splices `other` in at `index`, shifting later lines down. Returns the
    /// number of lines inserted.
    pub fn insert_lines(&mut self, index: usize, other: LineStore) -> usize {
        let count = other.lines.len();
        self.lines.splice(index..index, other.lines);
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Joins the line texts with `delimiter`.
    pub fn join(&self, delimiter: &str) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

impl Index<usize> for LineStore {
    type Output = Line;

    fn index(&self, index: usize) -> &Line {
        &self.lines[index]
    }
}
