//! Interactive lookups against one file, sharing a single cache.

use crate::cache::Category;
use crate::cli::{choose_from_menu, output, Location, TerminalNotifier, TerminalPicker};
use crate::editor::{Editor, TextBuffer};
use crate::lexical::LexicalClient;
use crate::lookup::{apply, LookupCoordinator, Outcome};
use crate::{Config, LookupError};
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Lookup(Category, Location),
    Alliterate(Location),
    Show(usize),
    Stats,
    Clear,
    Write,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or("").to_lowercase();
        let argument = parts.next();

        let location = || -> Result<Location, String> {
            argument
                .ok_or_else(|| format!("'{}' needs a LINE:COL argument", command))?
                .parse()
        };

        match command.as_str() {
            "allit" | "alliterate" => {
                let location = location()?;
                if location.to_column.is_none() {
                    return Err("allit needs a selection, e.g. allit 1:3-12".to_string());
                }
                Ok(SessionCommand::Alliterate(location))
            }
            "show" => argument
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .map(SessionCommand::Show)
                .ok_or_else(|| "show needs a line number".to_string()),
            "stats" => Ok(SessionCommand::Stats),
            "clear" => Ok(SessionCommand::Clear),
            "write" | "w" => Ok(SessionCommand::Write),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
            other => match other.parse::<Category>() {
                Ok(category) => Ok(SessionCommand::Lookup(category, location()?)),
                Err(_) => Err(format!("Unknown command: {} (try 'help')", other)),
            },
        }
    }
}

pub async fn run<C: LexicalClient>(
    path: &Path,
    lookup: &LookupCoordinator<C>,
    config: &Config,
    colored: bool,
) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut buffer = TextBuffer::new(&content);
    let mut picker = TerminalPicker::new(colored);
    let mut notifier = TerminalNotifier::new(colored);
    let mut dirty = false;

    println!(
        "{} ({} lines). Type 'help' for commands.",
        path.display(),
        buffer.line_count()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(message) => {
                output::print_notice(&message, colored);
                continue;
            }
        };

        match command {
            SessionCommand::Lookup(category, location) => {
                location.place(&mut buffer);
                let menu = match lookup
                    .menu_lookup(&buffer, category, config.editor_menu_max_results)
                    .await
                {
                    Ok(menu) => menu,
                    Err(e @ LookupError::NoTarget) => {
                        output::print_notice(&e.to_string(), colored);
                        continue;
                    }
                    Err(e) => {
                        output::print_notice(&format!("Lookup failed: {}", e), colored);
                        continue;
                    }
                };

                if menu.results.is_empty() {
                    output::print_notice(
                        &format!("No {} found for \"{}\"", category, menu.context.word),
                        colored,
                    );
                    continue;
                }

                if let Some(choice) = choose_from_menu(&menu, &mut picker) {
                    apply(&mut buffer, &menu.context.span, &choice);
                    output::print_replacement(&menu.context.word, &choice, path, colored);
                    dirty = true;
                }
            }
            SessionCommand::Alliterate(location) => {
                location.place(&mut buffer);
                let selected = buffer.selection();
                match lookup.alliterate(&mut buffer, &mut picker, &mut notifier).await {
                    Ok(Outcome::Replaced(choice)) => {
                        output::print_replacement(&selected, &choice, path, colored);
                        dirty = true;
                    }
                    Ok(_) => {}
                    Err(e) => output::print_notice(&format!("Lookup failed: {}", e), colored),
                }
            }
            SessionCommand::Show(n) => {
                println!("{:>4} | {}", n, buffer.line(n - 1));
            }
            SessionCommand::Stats => {
                output::print_cache_stats(&lookup.caches().stats(), colored);
            }
            SessionCommand::Clear => {
                lookup.clear_cache();
                println!("Cache cleared.");
            }
            SessionCommand::Write => {
                fs::write(path, buffer.to_string())
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                dirty = false;
                println!("Wrote {}", path.display());
            }
            SessionCommand::Help => output::print_session_help(colored),
            SessionCommand::Quit => break,
        }
    }

    if dirty {
        output::print_notice("Unsaved changes were discarded", colored);
    }

    Ok(())
}
