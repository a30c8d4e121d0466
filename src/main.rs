use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use wordswap::cli::output::{self, OutputFormat};
use wordswap::cli::{self as host, session, Location, TerminalNotifier, TerminalPicker};
use wordswap::config::Overrides;
use wordswap::editor::{Editor, TextBuffer};
use wordswap::lexical::DatamuseClient;
use wordswap::lookup::{apply, Outcome};
use wordswap::{Category, Config, ContextExtractor, LookupCoordinator, LookupError};

#[derive(Parser, Debug)]
#[command(name = "wordswap")]
#[command(version, about = "Swap the word under the cursor for a synonym, antonym or rhyme", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// File containing the word
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Line of the word (1-based)
    #[arg(short, long, default_value_t = 1)]
    line: usize,

    /// Column of the cursor, or start of the selection (1-based)
    #[arg(short, long, default_value_t = 1)]
    column: usize,

    /// End column of a selection (1-based, exclusive)
    #[arg(short = 't', long)]
    to_column: Option<usize>,

    /// What to look up
    #[arg(short, long, value_enum, default_value_t = Mode::Synonyms)]
    mode: Mode,

    /// Show a short menu with a "more" entry instead of the searchable picker
    #[arg(long, conflicts_with = "list")]
    menu: bool,

    /// Print the resolved word and sentence without looking anything up
    #[arg(long)]
    context: bool,

    /// Print the results without prompting
    #[arg(long)]
    list: bool,

    /// Output format for --list (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Results shown inline in the menu
    #[arg(long, env = "WORDSWAP_MENU_MAX")]
    menu_max: Option<usize>,

    /// Results printed by --list
    #[arg(long)]
    max_results: Option<usize>,

    /// Fall back to antonyms of close synonyms when there are no direct antonyms
    #[arg(long)]
    loose_antonyms: bool,

    /// Lexical service base URL
    #[arg(long, env = "WORDSWAP_API_URL")]
    api_url: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log lookups and cache activity to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run several lookups against one file, sharing the cache
    Session {
        /// File to edit
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Synonyms,
    Antonyms,
    Rhymes,
    Alliterate,
}

impl Mode {
    fn category(self) -> Option<Category> {
        match self {
            Mode::Synonyms => Some(Category::Synonym),
            Mode::Antonyms => Some(Category::Antonym),
            Mode::Rhymes => Some(Category::Rhyme),
            Mode::Alliterate => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.mode == Mode::Alliterate && (cli.list || cli.menu) {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "--mode alliterate cannot be combined with --list or --menu",
            )
            .exit();
    }

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "wordswap", &mut io::stdout());
        return Ok(());
    }

    init_logging(&cli);

    let config = Config::load(Overrides {
        editor_menu_max_results: cli.menu_max,
        suggestions_max_results: cli.max_results,
        strict_antonyms: cli.loose_antonyms.then_some(false),
        api_base_url: cli.api_url.clone(),
        ..Default::default()
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let colored = !cli.no_color && console::colors_enabled();
    let exit_code = runtime.block_on(run(&cli, &config, colored))?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli, config: &Config, colored: bool) -> Result<i32> {
    if let Some(Commands::Session { file }) = &cli.command {
        let lookup = LookupCoordinator::new(DatamuseClient::new(config)?, config);
        session::run(file, &lookup, config, colored).await?;
        return Ok(0);
    }

    let path = cli
        .file
        .as_deref()
        .context("No file specified. Use --help for usage information.")?;
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut buffer = TextBuffer::new(&content);
    Location::new(cli.line, cli.column, cli.to_column).place(&mut buffer);

    if cli.context {
        let context = ContextExtractor::extract(&buffer);
        if context.is_empty() {
            output::print_notice(&LookupError::NoTarget.to_string(), colored);
            return Ok(1);
        }
        output::print_results(path, "context", &context, &[], 0, colored, &cli.format);
        return Ok(0);
    }

    let lookup = LookupCoordinator::new(DatamuseClient::new(config)?, config);
    let mut picker = TerminalPicker::new(colored);
    let mut notifier = TerminalNotifier::new(colored);

    let Some(category) = cli.mode.category() else {
        let selected = buffer.selection();
        let outcome = lookup
            .alliterate(&mut buffer, &mut picker, &mut notifier)
            .await?;
        return finish(path, &buffer, &selected, outcome, colored);
    };

    if cli.list || cli.menu {
        let menu = match with_spinner(lookup.menu_lookup(
            &buffer,
            category,
            config.editor_menu_max_results,
        ))
        .await
        {
            Ok(menu) => menu,
            Err(LookupError::NoTarget) => {
                output::print_notice(&LookupError::NoTarget.to_string(), colored);
                return Ok(1);
            }
            Err(e) => return Err(e.into()),
        };

        if cli.list {
            output::print_results(
                path,
                &category.to_string(),
                &menu.context,
                &menu.results,
                config.suggestions_max_results,
                colored,
                &cli.format,
            );
            return Ok(0);
        }

        if menu.results.is_empty() {
            output::print_notice(
                &format!("No {} found for \"{}\"", category, menu.context.word),
                colored,
            );
            return Ok(0);
        }

        return match host::choose_from_menu(&menu, &mut picker) {
            Some(choice) => {
                apply(&mut buffer, &menu.context.span, &choice);
                finish(path, &buffer, &menu.context.word, Outcome::Replaced(choice), colored)
            }
            None => Ok(0),
        };
    }

    let word = ContextExtractor::extract(&buffer).word;
    let outcome = lookup
        .command_lookup(&mut buffer, category, &mut picker, &mut notifier)
        .await?;
    finish(path, &buffer, &word, outcome, colored)
}

/// Save the buffer when something was replaced and map the outcome to an exit code.
fn finish(
    path: &Path,
    buffer: &TextBuffer,
    old: &str,
    outcome: Outcome,
    colored: bool,
) -> Result<i32> {
    match outcome {
        Outcome::Replaced(new) => {
            fs::write(path, buffer.to_string())
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            output::print_replacement(old, &new, path, colored);
            Ok(0)
        }
        Outcome::NoTarget => Ok(1),
        Outcome::Dismissed | Outcome::NoResults => Ok(0),
    }
}

/// Spin on stderr while a lookup that does not prompt is in flight.
async fn with_spinner<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Looking up...");
    pb.enable_steady_tick(Duration::from_millis(80));

    let result = future.await;
    pb.finish_and_clear();
    result
}
