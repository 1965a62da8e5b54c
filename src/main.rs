// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{debug, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use ass2lrc::app_config::{self, Config};
use ass2lrc::app_controller::Controller;

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
    /// Filter ASS files and convert them to LRC (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for ass2lrc
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input ASS file or directory to process
    #[arg(value_name = "INPUT_PATH", default_value = ".")]
    input_path: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Name of the subdirectory receiving filtered scripts
    #[arg(long)]
    filtered_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "ass2lrc.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// ass2lrc - ASS subtitles to LRC lyrics
///
/// Removes animated and top-positioned lines from ASS subtitle files, then
/// converts the remaining dialogue into LRC lyric files.
#[derive(Parser, Debug)]
#[command(name = "ass2lrc")]
#[command(version)]
#[command(about = "Convert ASS subtitles to LRC lyrics")]
#[command(long_about = "ass2lrc filters ASS subtitle files and converts their dialogue to LRC lyrics.

EXAMPLES:
    ass2lrc                                # Convert every .ass file in the current directory
    ass2lrc song.ass                       # Convert a single file
    ass2lrc -r ~/karaoke                   # Walk a directory tree
    ass2lrc --filtered-dir cleaned ./subs  # Write filtered scripts to ./subs/cleaned
    ass2lrc completions bash > ass2lrc.bash

OUTPUT:
    Filtered scripts go to a 'filtered' subdirectory next to each input.
    LRC files are written next to the original input and are never
    overwritten: an existing .lrc file is left alone.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input ASS file or directory to process
    #[arg(value_name = "INPUT_PATH", default_value = ".")]
    input_path: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Name of the subdirectory receiving filtered scripts
    #[arg(long)]
    filtered_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "ass2lrc.json")]
    config_path: String,

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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Install the logger at the most verbose level and narrow it with
    // set_max_level once the configuration is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ass2lrc", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        None => run_convert(ConvertArgs {
            input_path: cli.input_path,
            recursive: cli.recursive,
            filtered_dir: cli.filtered_dir,
            config_path: cli.config_path,
            log_level: cli.log_level,
        }),
    }
}

fn load_config(options: &ConvertArgs) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        debug!("Config file not found at '{}', using defaults.", config_path);
        Config::default()
    };

    // Command line options win over the file
    if options.recursive {
        config.recursive = true;
    }

    if let Some(filtered_dir) = &options.filtered_dir {
        config.filtered_dir = filtered_dir.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it before reading the config
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    let summary = if options.input_path.is_file() {
        controller.run(&options.input_path)?
    } else if options.input_path.is_dir() {
        controller.run_folder(&options.input_path)?
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    };

    if options.input_path.is_file() {
        info!("{}", summary);
    }

    Ok(())
}
