use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use serde_json::json;
use spellrite::checker::dictionary::Dictionary;
use spellrite::cli::output::{self, OutputFormat};
use spellrite::config::{self, DetectorConfig, Overrides};
use spellrite::filter::{FilterChain, MarkdownCodeFilter, PatternFilter};
use spellrite::{dict, DictionaryDetector, Handlers, Report, SpellCore};
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name the driver registers its own filter chain under.
const DRIVER_FILTER: &str = "driver";

#[derive(Parser, Debug)]
#[command(name = "spellrite")]
#[command(version, about = "Classify misspellings as errors or warnings", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// List files being checked
    #[arg(short, long)]
    filenames: bool,

    /// Show debugging info
    #[arg(short, long)]
    debug: bool,

    /// Word to treat as correctly spelled (repeatable)
    #[arg(long = "valid-word", value_name = "WORD")]
    valid_words: Vec<String>,

    /// Word to report as a warning instead of an error (repeatable)
    #[arg(long = "warn-word", value_name = "WORD")]
    warn_words: Vec<String>,

    /// Regex whose matches are removed before checking (repeatable)
    #[arg(long = "strip", value_name = "REGEX")]
    strip_patterns: Vec<String>,

    /// Skip markdown code blocks and inline code
    #[arg(long)]
    markdown: bool,

    /// Config file to use instead of ./.spellrite.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Language/dictionary to use (e.g., en_US, en_GB)
    #[arg(short, long)]
    language: Option<String>,

    /// Dictionary file (.dict FST or plain word list)
    #[arg(long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if errors are found
    #[arg(long)]
    no_fail: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Download a dictionary
    Download {
        /// Language code (e.g., en_US, en_GB)
        language: String,
    },
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

/// Per-run counts of files that produced an errors or warnings report.
#[derive(Default)]
struct Tally {
    current_file: PathBuf,
    error_files: usize,
    warning_files: usize,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellrite", &mut io::stdout());
        return Ok(());
    }

    if let Some(command) = cli.command.take() {
        return handle_command(command);
    }

    init_logging(cli.debug);

    if cli.paths.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let doc = config::load(default_document(), &overrides(&cli))?;
    let detector = build_detector(&DetectorConfig::from_document(&doc)?)?;

    let colored = !cli.no_color;
    let text_output = cli.format == OutputFormat::Text;
    let tally = Rc::new(RefCell::new(Tally::default()));

    let on_errors = Rc::clone(&tally);
    let on_warnings = Rc::clone(&tally);
    let handlers = Handlers::new()
        .reporter("errors", move |words| {
            let mut tally = on_errors.borrow_mut();
            tally.error_files += 1;
            if text_output {
                println!("{}", output::error_line(&tally.current_file, words, colored));
            }
            Ok(())
        })
        .reporter("warnings", move |words| {
            let mut tally = on_warnings.borrow_mut();
            tally.warning_files += 1;
            if text_output {
                println!("{}", output::warning_line(&tally.current_file, words, colored));
            }
            Ok(())
        })
        .filter(DRIVER_FILTER, driver_filter(&cli)?);

    let mut core = SpellCore::from_document(Some(&doc), &handlers, Arc::new(detector))?;

    let mut results: Vec<(String, Report)> = Vec::new();
    for file_path in collect_files(&cli.paths) {
        if cli.filenames && text_output {
            output::print_checking(&file_path);
        }

        // Non-UTF-8 bytes become U+FFFD instead of failing the run
        let bytes = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))?;
        let text = String::from_utf8_lossy(&bytes);

        tally.borrow_mut().current_file = file_path.clone();
        let report = core.check(&text)?;
        results.push((file_path.display().to_string(), report));
    }

    let (error_files, warning_files) = {
        let tally = tally.borrow();
        (tally.error_files, tally.warning_files)
    };

    match cli.format {
        OutputFormat::Text => output::print_summary(error_files, warning_files, colored),
        OutputFormat::Json => output::print_json(&results)?,
    }

    if error_files > 0 && !cli.no_fail {
        std::process::exit(error_files.min(255) as i32);
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let filter = if debug { "spellrite=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

/// Options the driver starts from before config files and flags apply.
fn default_document() -> serde_json::Value {
    json!({
        "errors": "errors",
        "warnings": "warnings",
        "log": null,
        "filter": DRIVER_FILTER,
        "valid_words": ["wibble"],
        "warn_words": ["colour", "color"],
    })
}

fn overrides(cli: &Cli) -> Overrides {
    let custom_filter = cli.markdown || !cli.strip_patterns.is_empty();

    Overrides {
        config_file: cli.config.clone(),
        valid_words: cli.valid_words.clone(),
        warn_words: cli.warn_words.clone(),
        filter: custom_filter.then(|| DRIVER_FILTER.to_string()),
        log: cli.debug.then(|| "tracing".to_string()),
        language: cli.language.clone(),
        dictionary: cli.dictionary.clone(),
    }
}

/// Marker stripping, then any `--strip` patterns, then markdown code.
fn driver_filter(cli: &Cli) -> Result<FilterChain> {
    let mut chain = FilterChain::new().with(PatternFilter::markers());

    if !cli.strip_patterns.is_empty() {
        chain = chain.with(PatternFilter::new(&cli.strip_patterns)?);
    }
    if cli.markdown {
        chain = chain.with(MarkdownCodeFilter);
    }

    Ok(chain)
}

fn build_detector(config: &DetectorConfig) -> Result<DictionaryDetector> {
    let dictionary = match &config.dictionary {
        Some(path) => Dictionary::load_from_path(path)?,
        None => Dictionary::load(&config.language)?,
    };

    DictionaryDetector::new(dictionary).with_ignore_patterns(&config.ignore_patterns)
}

fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            eprintln!("Error: File not found: {}", path.display());
            continue;
        }

        if path.is_dir() {
            files.extend(walk(path));
        } else {
            files.push(path.clone());
        }
    }

    files
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(dir)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .collect();

    files.sort();
    files
}

fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => {
                dict::manager::list_dictionaries()?;
            }
            DictCommands::Download { language } => {
                dict::manager::download_dictionary(&language)?;
            }
            DictCommands::Info { language } => {
                dict::manager::show_info(&language)?;
            }
        },
    }
    Ok(())
}
