// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, OutputFormat};
use app_controller::Controller;

mod app_config;
mod subtitle_processor;
mod actor_classifier;
mod distribution;
mod output_writer;
mod file_utils;
mod app_controller;
mod errors;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Ass,
    Srt,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Ass => OutputFormat::Ass,
            CliOutputFormat::Srt => OutputFormat::Srt,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a subtitle script into per-actor files (default command)
    #[command(alias = "split")]
    Split(SplitArgs),

    /// Generate shell completions for rolesplit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SplitArgs {
    /// Input .ass file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output format for distributed files
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Do not distribute broadcast lines into per-actor files
    #[arg(long)]
    skip_group: bool,

    /// Do not distribute multiple-actor and exclusion lines into per-actor files
    #[arg(long)]
    skip_multiple: bool,

    /// Do not save caption/sign lines into a dedicated .ass file
    #[arg(long)]
    no_signs: bool,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// rolesplit - per-actor subtitle distribution
///
/// Splits an ASS subtitle script into one file per actor, honoring
/// broadcast lines, multiple-actor lines, exclusion lines and signs.
#[derive(Parser, Debug)]
#[command(name = "rolesplit")]
#[command(version = "1.1.0")]
#[command(about = "Split ASS subtitle scripts into per-actor files")]
#[command(long_about = "rolesplit parses an ASS subtitle script, classifies every Dialogue line by
its actor field and writes one subtitle file per actor.

EXAMPLES:
    rolesplit episode.ass                       # Split using default config
    rolesplit -f srt episode.ass                # Export simplified SRT captions
    rolesplit --skip-group episode.ass          # Keep broadcast lines in their own file
    rolesplit /subs/                            # Process every .ass file in a folder
    rolesplit --log-level debug episode.ass     # Verbose classification logging
    rolesplit completions bash > rolesplit.bash # Generate bash completions

ACTOR FIELD CONVENTIONS:
    Актер 1                  - single actor
    Актер 1, Актер 2         - several actors (also ';' separated)
    !Актер 1                 - everyone EXCEPT the named actors
    гуры / все               - broadcast to everyone
    Надпись / Sign / Text    - on-screen sign, not spoken dialogue

OUTPUT:
    Files are written to a Subtitles_by_Actor folder next to the source file,
    named '<source> - <actor> - (<line count>).<ext>'. Sign lines always go
    to an .ass file, whatever the chosen output format.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input .ass file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output format for distributed files
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Do not distribute broadcast lines into per-actor files
    #[arg(long)]
    skip_group: bool,

    /// Do not distribute multiple-actor and exclusion lines into per-actor files
    #[arg(long)]
    skip_multiple: bool,

    /// Do not save caption/sign lines into a dedicated .ass file
    #[arg(long)]
    no_signs: bool,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "rolesplit", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Split(args)) => run_split(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let split_args = SplitArgs {
                input_path,
                format: cli.format,
                skip_group: cli.skip_group,
                skip_multiple: cli.skip_multiple,
                no_signs: cli.no_signs,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_split(split_args)
        }
    }
}

fn run_split(args: SplitArgs) -> Result<()> {
    // Apply command line log level early if specified
    if let Some(log_level) = &args.log_level {
        log::set_max_level(level_filter_from(&log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = args
        .config_path
        .clone()
        .unwrap_or_else(Config::default_path);

    let mut config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at {:?}, creating default config.",
            config_path
        );
        let config = Config::default();
        config.save_to_file(&config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(format) = args.format {
        config.output_format = format.into();
    }
    if args.skip_group {
        config.distribute_group = false;
    }
    if args.skip_multiple {
        config.distribute_multiple = false;
    }
    if args.no_signs {
        config.save_signs = false;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level.into();
    }

    // Validate the configuration after loading and overriding
    config.validate()?;

    // Apply the effective log level from the final configuration
    log::set_max_level(level_filter_from(&config.log_level));

    let controller = Controller::with_config(config)?;
    controller.run(&args.input_path)
}

fn level_filter_from(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
