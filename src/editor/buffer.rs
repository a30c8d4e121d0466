use crate::editor::{CursorEnd, Editor};
use crate::{Position, Span};
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// Line-oriented in-memory document with a single selection.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    crlf: bool,
    anchor: Position,
    head: Position,
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        let crlf = text.contains("\r\n");
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            lines,
            crlf,
            anchor: Position::default(),
            head: Position::default(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Collapse the selection to `pos`.
    pub fn set_cursor(&mut self, pos: Position) {
        let pos = self.clamp(pos);
        self.anchor = pos;
        self.head = pos;
    }

    pub fn select(&mut self, anchor: Position, head: Position) {
        self.anchor = self.clamp(anchor);
        self.head = self.clamp(head);
    }

    fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len().saturating_sub(1));
        let len = self.lines.get(line).map_or(0, |l| l.chars().count());
        Position::new(line, pos.ch.min(len))
    }

    fn ordered(&self, a: Position, b: Position) -> (Position, Position) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl Editor for TextBuffer {
    fn selection(&self) -> String {
        self.range(self.anchor, self.head)
    }

    fn cursor(&self, end: CursorEnd) -> Position {
        let (from, to) = self.ordered(self.anchor, self.head);
        match end {
            CursorEnd::From => from,
            CursorEnd::To => to,
        }
    }

    fn word_at(&self, pos: Position) -> Option<Span> {
        let pos = self.clamp(pos);
        let line = self.lines.get(pos.line)?;

        word_ranges(line)
            .into_iter()
            .find(|&(start, end)| start <= pos.ch && pos.ch <= end)
            .map(|(start, end)| {
                Span::new(Position::new(pos.line, start), Position::new(pos.line, end))
            })
    }

    fn line(&self, index: usize) -> String {
        self.lines.get(index).cloned().unwrap_or_default()
    }

    fn range(&self, from: Position, to: Position) -> String {
        let (from, to) = self.ordered(from, to);

        if from.line == to.line {
            let line = &self.lines[from.line];
            return line[byte_offset(line, from.ch)..byte_offset(line, to.ch)].to_string();
        }

        let mut out = String::new();
        for index in from.line..=to.line {
            let line = &self.lines[index];
            let start = if index == from.line { byte_offset(line, from.ch) } else { 0 };
            let end = if index == to.line { byte_offset(line, to.ch) } else { line.len() };
            out.push_str(&line[start..end]);
            if index != to.line {
                out.push('\n');
            }
        }
        out
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let (from, to) = self.ordered(from, to);

        let first = &self.lines[from.line];
        let last = &self.lines[to.line];
        let prefix = first[..byte_offset(first, from.ch)].to_string();
        let suffix = last[byte_offset(last, to.ch)..].to_string();

        let inserted: Vec<&str> = text.split('\n').collect();
        let mut replacement = Vec::with_capacity(inserted.len());
        for (i, part) in inserted.iter().enumerate() {
            let mut line = String::new();
            if i == 0 {
                line.push_str(&prefix);
            }
            line.push_str(part);
            replacement.push(line);
        }

        let end_line = from.line + replacement.len() - 1;
        let end_ch = replacement[replacement.len() - 1].chars().count();
        if let Some(tail) = replacement.last_mut() {
            tail.push_str(&suffix);
        }

        self.lines.splice(from.line..=to.line, replacement);
        self.set_cursor(Position::new(end_line, end_ch));
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.crlf { "\r\n" } else { "\n" };
        write!(f, "{}", self.lines.join(separator))
    }
}

fn byte_offset(line: &str, ch: usize) -> usize {
    line.char_indices()
        .nth(ch)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

fn is_word_grapheme(grapheme: &str) -> bool {
    let ch = grapheme.chars().next().unwrap_or(' ');
    ch.is_alphanumeric() || ch == '\'' || ch == '-' || ch == '\u{2019}'
}

fn is_joiner(grapheme: &str) -> bool {
    matches!(grapheme, "'" | "-" | "\u{2019}")
}

/// Char ranges of the words on a line.
fn word_ranges(line: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut run: Vec<(usize, &str)> = Vec::new();
    let mut pos = 0;

    for grapheme in line.graphemes(true) {
        if is_word_grapheme(grapheme) {
            run.push((pos, grapheme));
        } else {
            push_run(&mut ranges, &run);
            run.clear();
        }
        pos += grapheme.chars().count();
    }
    push_run(&mut ranges, &run);

    ranges
}

fn push_run(ranges: &mut Vec<(usize, usize)>, run: &[(usize, &str)]) {
    let start = run.iter().position(|(_, g)| !is_joiner(g));
    let end = run.iter().rposition(|(_, g)| !is_joiner(g));

    if let (Some(start), Some(end)) = (start, end) {
        let (first_pos, _) = run[start];
        let (last_pos, last) = run[end];
        ranges.push((first_pos, last_pos + last.chars().count()));
    }
}
