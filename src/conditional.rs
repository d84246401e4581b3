//! Nesting of `#ifdef`/`#ifndef` blocks and the exclusion depth.
//!
//! Every opened conditional is pushed, even inside an excluded region, so that
//! each `#endif` pops exactly the block it closes. Once a block is inactive,
//! it and every block opened inside it add one level of exclusion, and each
//! matching `#endif` takes one level away.

/// A conditional that has been opened and not yet closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenConditional {
    /// Index in the line store where the directive stood.
    pub start: usize,
    /// Line number of the directive, for diagnostics.
    pub line: usize,
}

/// What closing the innermost conditional means for its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closed {
    /// The block was live; only the `#endif` line goes.
    Live,
    /// The block was pruned; everything from `start` through the `#endif` goes.
    Excluded { start: usize },
}

#[derive(Debug, Default)]
pub struct ConditionalStack {
    open: Vec<OpenConditional>,
    excluded: usize,
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while lines are kept and directives take effect.
    pub fn is_live(&self) -> bool {
        self.excluded == 0
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Opens a block. `active` is the outcome of the block's own condition.
    pub fn open(&mut self, start: usize, line: usize, active: bool) {
        self.open.push(OpenConditional { start, line });
        if !active || self.excluded > 0 {
            self.excluded += 1;
        }
    }

    /// Closes the innermost block, or returns `None` if nothing is open.
    pub fn close(&mut self) -> Option<Closed> {
        let OpenConditional { start, .. } = self.open.pop()?;
        if self.excluded > 0 {
            self.excluded -= 1;
            Some(Closed::Excluded { start })
        } else {
            Some(Closed::Live)
        }
    }

    /// The outermost block still waiting for its `#endif`.
    pub fn first_unclosed(&self) -> Option<&OpenConditional> {
        self.open.first()
    }
}
