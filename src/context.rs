//! Target word and sentence extraction.
//!
//! The sentence is a bounded heuristic, not a tokenizer: it only looks at the
//! line holding the word and keeps at most [`CONTEXT_WORDS`] words on either
//! side, stopping early at `.`, `!` or `?`.

use crate::editor::{CursorEnd, Editor};
use crate::{Span, WordContext};

/// Words kept on each side of the target.
///
/// Every whitespace char counts as one boundary. The scan halts on the sixth
/// one it meets, so `"a b c d e f g TARGET h i j k l m n"` yields
/// `"c d e f g TARGET h i j k l"`.
pub const CONTEXT_WORDS: usize = 5;

const SENTENCE_END: [char; 3] = ['.', '!', '?'];

pub struct ContextExtractor;

impl ContextExtractor {
    /// Resolve the word under the selection or cursor.
    ///
    /// Returns an empty [`WordContext`] when there is no selection and the
    /// cursor is not touching a word.
    pub fn extract<E: Editor + ?Sized>(editor: &E) -> WordContext {
        let selection = editor.selection();

        let (word, span) = if !selection.is_empty() {
            let span = Span::new(editor.cursor(CursorEnd::From), editor.cursor(CursorEnd::To));
            (selection, span)
        } else {
            let cursor = editor.cursor(CursorEnd::From);
            match editor.word_at(cursor) {
                Some(span) => (editor.range(span.from, span.to), span),
                None => return WordContext::default(),
            }
        };

        let line = editor.line(span.from.line);
        let end = if span.to.line == span.from.line {
            span.to.ch
        } else {
            line.chars().count()
        };
        let sentence = sentence_around(&line, span.from.ch, end);

        tracing::debug!(word = %word, sentence = %sentence, "resolved word context");

        WordContext {
            word,
            span,
            sentence,
        }
    }
}

/// The sentence fragment of `line` around the char range `from..to`.
pub fn sentence_around(line: &str, from: usize, to: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let to = to.min(chars.len());
    let from = from.min(to);

    let start = scan_back(&chars, from);
    let end = scan_forward(&chars, to);

    chars[start..end]
        .iter()
        .collect::<String>()
        .trim_matches(|c: char| c.is_whitespace() || SENTENCE_END.contains(&c))
        .to_string()
}

fn scan_back(chars: &[char], from: usize) -> usize {
    let mut crossed = 0;
    let mut i = from;

    while i > 0 {
        i -= 1;
        let c = chars[i];
        if SENTENCE_END.contains(&c) {
            return i;
        }
        if c.is_whitespace() {
            crossed += 1;
            if crossed > CONTEXT_WORDS {
                return i + 1;
            }
        }
    }

    0
}

fn scan_forward(chars: &[char], to: usize) -> usize {
    let mut crossed = 0;

    for (i, &c) in chars.iter().enumerate().skip(to) {
        if SENTENCE_END.contains(&c) {
            return i;
        }
        if c.is_whitespace() {
            crossed += 1;
            if crossed > CONTEXT_WORDS {
                return i;
            }
        }
    }

    chars.len()
}
