// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use vernacular::app_config::{Config, LogLevel};
use vernacular::app_controller::{Controller, RunOptions};
use vernacular::enrichment::Language;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI wrapper for Language to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLanguage {
    En,
    Ja,
}

impl From<CliLanguage> for Language {
    fn from(cli_language: CliLanguage) -> Self {
        match cli_language {
            CliLanguage::En => Language::English,
            CliLanguage::Ja => Language::Japanese,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Enrich the species list with common names (default command)
    Enrich(EnrichArgs),

    /// Group the finished table by common name into a JSONL export
    Group(GroupArgs),
}

#[derive(Parser, Debug)]
struct EnrichArgs {
    /// Line number to start processing from
    #[arg(long, default_value_t = 1)]
    start: usize,

    /// Process only the given line number (forces append mode)
    #[arg(long, conflicts_with = "start")]
    line: Option<usize>,

    /// Number of species processed concurrently per batch
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct GroupArgs {
    /// Language of the common-name column to group by
    #[arg(short, long, value_enum)]
    language: CliLanguage,

    /// Input CSV path (defaults to the configured output table)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output JSONL path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,
}

/// vernacular - common-name enrichment for scientific species lists
///
/// Fetches English and Japanese common names for every scientific name in
/// an input list and writes them incrementally to a resumable CSV table.
#[derive(Parser, Debug)]
#[command(name = "vernacular")]
#[command(version = "0.1.0")]
#[command(about = "Fetch common names for scientific species names")]
#[command(long_about = "vernacular enriches an ordered list of scientific species names with
English and Japanese common names fetched from an OpenAI-compatible
completion service.

EXAMPLES:
    vernacular                          # Process the whole list from line 1
    vernacular enrich --start 51        # Resume from line 51, appending
    vernacular enrich --line 7          # Reprocess a single line (appends)
    vernacular enrich -b 20             # Larger batches (more concurrency)
    vernacular group -l en              # Group the table by English name
    vernacular group -l ja -o out.jsonl # Group by Japanese name

CONFIGURATION:
    Configuration is stored in conf.json by default. Missing fields fall
    back to defaults; the API key can also be supplied via OPENAI_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    enrich: EnrichArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = match record.level() {
                Level::Error => writeln!(stderr, "\x1B[1;31m{} ERROR {}\x1B[0m", now, record.args()),
                Level::Warn => writeln!(stderr, "\x1B[1;33m{} WARN  {}\x1B[0m", now, record.args()),
                Level::Info => writeln!(stderr, "{} {}", now, record.args()),
                Level::Debug => writeln!(stderr, "\x1B[1;36m{} DEBUG {}\x1B[0m", now, record.args()),
                Level::Trace => writeln!(stderr, "\x1B[0;37m{} TRACE {}\x1B[0m", now, record.args()),
            };
        }
    }

    fn flush(&self) {}
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

async fn run_enrich(args: EnrichArgs) -> Result<()> {
    let mut config = Config::from_file_or_default(&args.config_path)?;
    if let Some(cli_level) = args.log_level {
        config.log_level = cli_level.into();
    }
    CustomLogger::init(level_filter(&config.log_level))?;

    let controller = Controller::with_config(config)?;
    controller
        .run(RunOptions {
            start: args.start,
            line: args.line,
            batch_size: args.batch_size,
        })
        .await
}

fn run_group(args: GroupArgs) -> Result<()> {
    let config = Config::from_file_or_default(&args.config_path)?;
    CustomLogger::init(level_filter(&config.log_level))?;

    let controller = Controller::with_config(config)?;
    controller.group(args.language.into(), args.input, args.output)
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = CommandLineOptions::parse();

    match options.command {
        Some(Commands::Enrich(args)) => run_enrich(args).await,
        Some(Commands::Group(args)) => run_group(args),
        // No subcommand: behave as `enrich` with the top-level flags
        None => run_enrich(options.enrich).await,
    }
}
