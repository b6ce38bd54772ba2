// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::{BufReader, Write};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::{Config, OperationKind};
use crate::batch_dispatcher::{
    BatchDispatcher, BatchJob, BatchOutcome, NullRenamePrompt, ProgressSink, ProgressUpdate,
    RenamePrompt,
};
use crate::file_utils::FileManager;

mod app_config;
mod batch_dispatcher;
mod errors;
mod file_utils;
mod subtitle_converter;
mod timecode;

/// CLI Wrapper for OperationKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOperation {
    /// Zero the hour fields of VTT timecodes
    ZeroHourVtt,
    /// Convert SRT files to VTT
    SrtToVtt,
}

impl From<CliOperation> for OperationKind {
    fn from(cli_operation: CliOperation) -> Self {
        match cli_operation {
            CliOperation::ZeroHourVtt => OperationKind::ZeroHourVtt,
            CliOperation::SrtToVtt => OperationKind::SrtToVtt,
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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Batch-convert subtitle files in a directory (default command)
    #[command(alias = "convert")]
    Convert(ConvertArgs),

    /// Generate shell completions for vttzero
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input directory whose subtitle files are processed
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Output directory for converted files (defaults to the input directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Operation to perform
    #[arg(long, value_enum)]
    operation: Option<CliOperation>,

    /// Number output files sequentially ({prefix}{index}.vtt)
    #[arg(short, long)]
    sequential: bool,

    /// Prefix for sequential numbering (may be empty)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Ask for a replacement name for each file
    #[arg(short, long)]
    rename: bool,

    /// Process files one at a time instead of across a worker pool
    #[arg(long)]
    no_parallel: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// vttzero - Batch subtitle timecode processing
///
/// Zeroes the hour component of WebVTT timecodes and converts SRT subtitle
/// files into WebVTT format, over a whole directory at a time.
#[derive(Parser, Debug)]
#[command(name = "vttzero")]
#[command(version = "0.1.0")]
#[command(about = "Batch VTT hour-zeroing and SRT to VTT conversion")]
#[command(long_about = "vttzero processes every matching subtitle file in a directory: it zeroes
the hour fields of WebVTT timecode ranges, or converts SRT files to WebVTT.

EXAMPLES:
    vttzero ./subs                              # Zero VTT hours, outputs next to inputs
    vttzero -o ./out ./subs                     # Write outputs into ./out
    vttzero --operation srt-to-vtt ./subs       # Convert SRT files to VTT
    vttzero -s -p ep ./subs                     # Sequential naming: ep1.vtt, ep2.vtt, ...
    vttzero -r ./subs                           # Ask for a new name per file
    vttzero --no-parallel ./subs                # Process files one at a time
    vttzero completions bash > vttzero.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input directory whose subtitle files are processed
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Output directory for converted files (defaults to the input directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Operation to perform
    #[arg(long, value_enum)]
    operation: Option<CliOperation>,

    /// Number output files sequentially ({prefix}{index}.vtt)
    #[arg(short, long)]
    sequential: bool,

    /// Prefix for sequential numbering (may be empty)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Ask for a replacement name for each file
    #[arg(short, long)]
    rename: bool,

    /// Process files one at a time instead of across a worker pool
    #[arg(long)]
    no_parallel: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
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

/// Progress sink rendering a terminal progress bar with running counts
struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(template_result.progress_chars("█▓▒░"));
        ProgressBarSink { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ProgressBarSink {
    fn on_progress(&self, update: ProgressUpdate) {
        if self.bar.length() != Some(update.total as u64) {
            self.bar.set_length(update.total as u64);
        }
        self.bar.set_position(update.completed as u64);
        self.bar
            .set_message(format!("Processed: {}, Failed: {}", update.processed, update.failed));
    }
}

/// Rename prompt reading replacement names from stdin
struct StdinRenamePrompt;

impl RenamePrompt for StdinRenamePrompt {
    fn ask(&self, base_name: &str) -> Option<String> {
        eprint!(
            "Enter new name for {} (leave blank to keep original name): ",
            base_name
        );
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer).ok()?;
        Some(answer.trim().to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vttzero", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_dir = cli
                .input_dir
                .ok_or_else(|| anyhow!("INPUT_DIR is required when no subcommand is specified"))?;

            let convert_args = ConvertArgs {
                input_dir,
                output_dir: cli.output_dir,
                operation: cli.operation,
                sequential: cli.sequential,
                prefix: cli.prefix,
                rename: cli.rename,
                no_parallel: cli.no_parallel,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_convert(convert_args).await
        }
    }
}

async fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(operation) = &options.operation {
        config.operation = operation.clone().into();
    }

    if options.sequential {
        config.naming.sequential_numbering = true;
    }

    if let Some(prefix) = &options.prefix {
        config.naming.sequence_prefix = prefix.clone();
    }

    if options.rename {
        config.naming.interactive_rename = true;
    }

    if options.no_parallel {
        config.parallel = false;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| options.input_dir.clone());

    let job = BatchJob::from_config(&config, options.input_dir.clone(), output_dir.clone());

    // The rename prompt blocks on stdin per file, before dispatch
    let stdin_prompt = StdinRenamePrompt;
    let null_prompt = NullRenamePrompt;
    let prompt: &dyn RenamePrompt = if config.naming.interactive_rename {
        &stdin_prompt
    } else {
        &null_prompt
    };

    let progress = Arc::new(ProgressBarSink::new());
    let dispatcher = BatchDispatcher::new();

    let start_time = Instant::now();
    let outcome = dispatcher
        .run(&job, prompt, progress.clone() as Arc<dyn ProgressSink>)
        .await?;
    progress.finish();

    match outcome {
        BatchOutcome::NoMatchingFiles => {
            info!("No matching files found in the input directory.");
        }
        BatchOutcome::Completed(result) => {
            // Give summary results - important for batch operations
            let summary_message = format!(
                "{} completed: {} processed, {} failed",
                config.operation.display_name(),
                result.processed,
                result.failed
            );
            info!("{}", summary_message);

            // Write summary to log file
            let log_file_path = output_dir.join("vttzero.log");
            let log_entry = format!(
                "{} - Duration: {}",
                summary_message,
                format_duration(start_time.elapsed())
            );

            if let Err(e) = FileManager::append_to_log_file(&log_file_path, &log_entry) {
                warn!("Failed to write batch log to file: {}", e);
            } else {
                info!("Batch log written to {}", log_file_path.display());
            }
        }
    }

    Ok(())
}

// Format duration in a human-readable format
fn format_duration(duration: std::time::Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
