pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod lexical;
pub mod lookup;

pub use cache::{CacheSet, Category, ResultCache};
pub use config::Config;
pub use context::ContextExtractor;
pub use error::LookupError;
pub use lookup::LookupCoordinator;

/// A zero-based location in a document. `ch` counts chars, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// A range of text on a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub from: Position,
    pub to: Position,
}

impl Span {
    /// Build a span, swapping the ends if they arrive reversed.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }
}

/// The word a lookup targets, where it sits, and the sentence around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordContext {
    pub word: String,
    pub span: Span,
    pub sentence: String,
}

impl WordContext {
    /// True when neither a selection nor the cursor resolved to a word.
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }
}
