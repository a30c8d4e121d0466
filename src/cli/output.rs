use crate::cache::Category;
use crate::WordContext;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonLookup<'a> {
    file: String,
    category: &'a str,
    word: &'a str,
    line: usize,
    column: usize,
    sentence: &'a str,
    total: usize,
    results: &'a [String],
}

/// Print up to `limit` results for a resolved word.
pub fn print_results(
    file_path: &Path,
    category: &str,
    context: &WordContext,
    results: &[String],
    limit: usize,
    colored_output: bool,
    format: &OutputFormat,
) {
    let shown = &results[..results.len().min(limit)];
    match format {
        OutputFormat::Text => print_text_results(category, context, results.len(), shown, colored_output),
        OutputFormat::Json => print_json_results(file_path, category, context, results.len(), shown),
    }
}

fn print_text_results(
    category: &str,
    context: &WordContext,
    total: usize,
    shown: &[String],
    colored_output: bool,
) {
    let position = format!("{}:{}", context.span.from.line + 1, context.span.from.ch + 1);

    if colored_output {
        println!(
            "{} {} {}",
            position.blue().bold(),
            context.word.yellow().bold(),
            format_context(&context.sentence, &context.word, colored_output).dimmed()
        );
        println!("  {} {}", category.cyan().bold(), format!("({})", total).dimmed());
        for result in shown {
            println!("    {} {}", "→".dimmed(), result.green());
        }
    } else {
        println!("{} {} {}", position, context.word, context.sentence);
        println!("  {} ({})", category, total);
        for result in shown {
            println!("    → {}", result);
        }
    }

    if total > shown.len() {
        let more = format!("… {} more", total - shown.len());
        if colored_output {
            println!("    {}", more.dimmed());
        } else {
            println!("    {}", more);
        }
    }
}

fn print_json_results(
    file_path: &Path,
    category: &str,
    context: &WordContext,
    total: usize,
    shown: &[String],
) {
    let output = JsonLookup {
        file: file_path.display().to_string(),
        category,
        word: &context.word,
        line: context.span.from.line + 1,
        column: context.span.from.ch + 1,
        sentence: &context.sentence,
        total,
        results: shown,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to encode results: {}", e),
    }
}

fn format_context(context: &str, word: &str, colored: bool) -> String {
    if colored && !word.is_empty() {
        context.replacen(word, &word.yellow().bold().to_string(), 1)
    } else {
        context.to_string()
    }
}

pub fn print_notice(message: &str, colored: bool) {
    if colored {
        eprintln!("{} {}", "!".yellow().bold(), message.yellow());
    } else {
        eprintln!("! {}", message);
    }
}

pub fn print_replacement(old: &str, new: &str, file_path: &Path, colored: bool) {
    if colored {
        println!(
            "{} {} {} {} in {}",
            "✓".green().bold(),
            old.red().strikethrough(),
            "→".dimmed(),
            new.green().bold(),
            file_path.display().to_string().cyan()
        );
    } else {
        println!("✓ {} → {} in {}", old, new, file_path.display());
    }
}

pub fn print_cache_stats(stats: &[(Category, usize)], colored: bool) {
    for (category, count) in stats {
        let noun = if *count == 1 { "word" } else { "words" };
        if colored {
            println!("  {} {} {}", category.to_string().cyan(), count.to_string().bold(), noun);
        } else {
            println!("  {} {} {}", category, count, noun);
        }
    }
}

pub fn print_session_help(colored: bool) {
    let lines = [
        ("syn L:C[-C2]", "synonyms for the word at line L, column C"),
        ("ant L:C[-C2]", "antonyms"),
        ("rhyme L:C[-C2]", "rhymes"),
        ("allit L:C-C2", "alliterative synonyms for a two-word selection"),
        ("show L", "print a line"),
        ("stats", "cached words per category"),
        ("clear", "clear the lookup cache"),
        ("write", "save the file"),
        ("quit", "leave the session"),
    ];

    for (command, help) in lines {
        if colored {
            println!("  {:<16} {}", command.cyan(), help.dimmed());
        } else {
            println!("  {:<16} {}", command, help);
        }
    }
}
