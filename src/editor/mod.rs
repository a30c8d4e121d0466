pub mod buffer;

pub use buffer::TextBuffer;

use crate::{Position, Span};

/// Which end of the selection to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorEnd {
    From,
    To,
}

/// The text surface lookups read from and write back to.
///
/// Positions out of range are clamped by implementations rather than
/// rejected.
pub trait Editor {
    /// Currently selected text, empty when the selection is collapsed.
    fn selection(&self) -> String;

    fn cursor(&self, end: CursorEnd) -> Position;

    /// Range of the word containing or touching `pos`, if any.
    fn word_at(&self, pos: Position) -> Option<Span>;

    /// Raw text of a line, empty when the index is out of range.
    fn line(&self, index: usize) -> String;

    fn range(&self, from: Position, to: Position) -> String;

    fn replace_range(&mut self, text: &str, from: Position, to: Position);
}

/// Prompts the user to choose one entry out of a searchable list.
pub trait Picker {
    fn pick(&mut self, title: &str, items: &[String]) -> Option<String>;
}

/// Transient user-facing messages.
pub trait Notifier {
    fn notice(&mut self, message: &str);
}
