pub mod output;
pub mod session;

use crate::editor::{Notifier, Picker, TextBuffer};
use crate::lookup::{Menu, MenuEntry};
use crate::Position;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{FuzzySelect, Select};
use std::str::FromStr;

/// A 1-based `LINE:COL` or `LINE:COL-COL` location on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub to_column: Option<usize>,
}

impl Location {
    pub fn new(line: usize, column: usize, to_column: Option<usize>) -> Self {
        Self {
            line,
            column,
            to_column,
        }
    }

    /// Move the buffer's cursor (or selection) to this location.
    pub fn place(&self, buffer: &mut TextBuffer) {
        let line = self.line.saturating_sub(1);
        let from = Position::new(line, self.column.saturating_sub(1));
        match self.to_column {
            Some(to) => buffer.select(from, Position::new(line, to.saturating_sub(1))),
            None => buffer.set_cursor(from),
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, columns) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected LINE:COL, got '{}'", s))?;
        let (column, to_column) = match columns.split_once('-') {
            Some((from, to)) => (from, Some(to)),
            None => (columns, None),
        };

        let parse = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("Invalid position '{}' in '{}'", value, s))
        };

        Ok(Self {
            line: parse(line)?,
            column: parse(column)?,
            to_column: to_column.map(parse).transpose()?,
        })
    }
}

fn theme(colored: bool) -> Box<dyn Theme> {
    if colored {
        Box::new(ColorfulTheme::default())
    } else {
        Box::new(SimpleTheme)
    }
}

/// Searchable terminal picker.
pub struct TerminalPicker {
    colored: bool,
}

impl TerminalPicker {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }
}

impl Picker for TerminalPicker {
    fn pick(&mut self, title: &str, items: &[String]) -> Option<String> {
        let theme = theme(self.colored);
        let selection = FuzzySelect::with_theme(theme.as_ref())
            .with_prompt(title)
            .items(items)
            .default(0)
            .interact_opt();

        match selection {
            Ok(index) => index.and_then(|i| items.get(i).cloned()),
            Err(e) => {
                tracing::warn!(error = %e, "picker failed");
                None
            }
        }
    }
}

pub struct TerminalNotifier {
    colored: bool,
}

impl TerminalNotifier {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }
}

impl Notifier for TerminalNotifier {
    fn notice(&mut self, message: &str) {
        output::print_notice(message, self.colored);
    }
}

/// Show a menu; "more" falls through to the searchable picker.
pub fn choose_from_menu(menu: &Menu, picker: &mut TerminalPicker) -> Option<String> {
    let theme = theme(picker.colored);
    let title = format!("\"{}\"", menu.context.word);
    let selection = Select::with_theme(theme.as_ref())
        .with_prompt(&title)
        .items(&menu.entries)
        .default(0)
        .interact_opt();

    let index = match selection {
        Ok(index) => index?,
        Err(e) => {
            tracing::warn!(error = %e, "menu failed");
            return None;
        }
    };

    resolve_menu_choice(menu, index, picker)
}

/// The word behind menu entry `index`. "More" asks `picker` over every result.
pub fn resolve_menu_choice<P: Picker + ?Sized>(
    menu: &Menu,
    index: usize,
    picker: &mut P,
) -> Option<String> {
    match menu.entries.get(index)? {
        MenuEntry::Replace(word) => Some(word.clone()),
        MenuEntry::ShowMore { .. } => {
            let title = format!("\"{}\"", menu.context.word);
            picker.pick(&title, &menu.results)
        }
    }
}
