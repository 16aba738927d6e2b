// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, OutputFormat};
use crate::app_controller::Controller;
use crate::presets::PresetStore;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod generation;
mod language_utils;
mod presets;
mod providers;
mod serializer;
mod subtitle;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Srt,
    Vtt,
    Ass,
    Json,
    Txt,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Vtt => OutputFormat::Vtt,
            CliOutputFormat::Ass => OutputFormat::Ass,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Txt => OutputFormat::Txt,
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
    /// Transcribe audio or video into subtitles (default command)
    Transcribe(TranscribeArgs),

    /// Generate subtitles from a text file on a synthetic timeline
    Text(TextArgs),

    /// List, save, or delete setting presets
    Presets {
        #[command(flatten)]
        common: CommonArgs,

        #[command(subcommand)]
        action: PresetAction,
    },

    /// Check whether the recognition engine is running
    Status(CommonArgs),

    /// List supported language codes
    Languages,

    /// Generate shell completions for scrybe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum PresetAction {
    /// List available presets
    List,

    /// Save the active subtitle settings under a name
    Add {
        /// Name of the new preset
        name: String,
    },

    /// Delete a custom preset by name or id
    Delete {
        /// Name or id of the preset to delete
        name: String,
    },
}

#[derive(Parser, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Apply a named preset's subtitle settings
    #[arg(short, long)]
    preset: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Language code (e.g. 'en', 'pt') or 'auto'
    #[arg(short, long)]
    language: Option<String>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    /// Input media file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file path; defaults to the input name with the language and format extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct TextArgs {
    /// Input text file, or '-' to read from standard input
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file path; omit to print to standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

/// Scrybe - Subtitle generation from speech and text
///
/// Generates readable subtitles from audio and video through a local Whisper
/// recognition engine, or from raw text on a synthetic timeline.
#[derive(Parser, Debug)]
#[command(name = "scrybe")]
#[command(version = "0.3.0")]
#[command(about = "Subtitle generation from speech and text")]
#[command(long_about = "Scrybe transcribes audio and video through a local Whisper engine and \
segments the result into readable, well-timed subtitles. It can also build \
subtitles from plain text with estimated timing.

EXAMPLES:
    scrybe episode.mp4                      # Transcribe using default config
    scrybe -f episode.mp4                   # Force overwrite existing files
    scrybe --preset shorts clip.mp4         # Use the Shorts / Reels preset
    scrybe -l pt episode.mp4                # Force Portuguese recognition
    scrybe --format vtt episode.mp4         # Export WebVTT
    scrybe text script.txt -o script.srt    # Subtitles from plain text
    scrybe presets list                     # Show available presets
    scrybe status                           # Check the recognition engine
    scrybe completions bash > scrybe.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

THE ENGINE:
    Transcription requires the Whisper engine serving on the local loopback
    (http://127.0.0.1:5123 by default). 'scrybe text' works without it.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input media file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    common: CommonArgs,
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
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
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
            generate(shell, &mut cmd, "scrybe", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Transcribe(args)) => run_transcribe(args).await,
        Some(Commands::Text(args)) => run_text(args),
        Some(Commands::Presets { common, action }) => run_presets(&common, action),
        Some(Commands::Status(common)) => run_status(common).await,
        Some(Commands::Languages) => run_languages(),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_transcribe(TranscribeArgs {
                input_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                common: cli.common,
            }).await
        }
    }
}

/// Load the configuration, apply CLI overrides, and sync the log level
fn load_config(common: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &common.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    let config_path = Path::new(&common.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", common.config_path);
        let config = Config::default();
        config.save_to_file(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", common.config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(preset_name) = &common.preset {
        let store = PresetStore::load_default()?;
        let preset = store.find(preset_name)
            .ok_or_else(|| anyhow!("No preset matches '{}'; run 'scrybe presets list'", preset_name))?;
        info!("Applying preset '{}'", preset.name);
        config.subtitle = preset.settings.clone();
    }
    if let Some(format) = &common.format {
        config.output_format = format.clone().into();
    }
    if let Some(language) = &common.language {
        config.language = language.clone();
    }
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if common.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    Ok(config)
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

async fn run_transcribe(args: TranscribeArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    let controller = Controller::with_config(config)?;

    if args.input_path.is_file() {
        controller.run_transcribe(&args.input_path, args.output, args.force_overwrite).await?;
    } else if args.input_path.is_dir() {
        controller.run_folder(&args.input_path, args.force_overwrite).await?;
    } else {
        return Err(anyhow!("Input path does not exist: {}", args.input_path.display()));
    }

    Ok(())
}

fn run_text(args: TextArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    let controller = Controller::with_config(config)?;

    let text = if args.input_path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)
            .context("Failed to read text from standard input")?;
        buffer
    } else {
        std::fs::read_to_string(&args.input_path)
            .with_context(|| format!("Failed to read text file: {}", args.input_path.display()))?
    };

    let rendered = controller.run_text(&text, args.output.as_deref())?;
    if args.output.is_none() {
        print!("{}", rendered);
    }

    Ok(())
}

fn run_presets(common: &CommonArgs, action: PresetAction) -> Result<()> {
    let mut store = PresetStore::load_default()?;

    match action {
        PresetAction::List => {
            println!("{:<38} {:<16} {:>6} {:>6} {:>9} {:>9} {:>6}", "NAME", "ID", "CHARS", "LINES", "MIN(s)", "MAX(s)", "CPS");
            for preset in store.presets() {
                let s = &preset.settings;
                let name = if preset.built_in {
                    format!("{} (built-in)", preset.name)
                } else {
                    preset.name.clone()
                };
                println!(
                    "{:<38} {:<16} {:>6} {:>6} {:>9.1} {:>9.1} {:>6.1}",
                    name, preset.id, s.max_chars_per_line, s.max_lines,
                    s.min_duration, s.max_duration, s.max_cps
                );
            }
        }
        PresetAction::Add { name } => {
            let config = Config::from_file_or_default(Path::new(&common.config_path));
            let preset = store.add(&name, config.subtitle)?;
            println!("Saved preset '{}' ({})", preset.name, preset.id);
        }
        PresetAction::Delete { name } => {
            store.delete(&name)?;
            println!("Deleted preset '{}'", name);
        }
    }

    Ok(())
}

async fn run_status(common: CommonArgs) -> Result<()> {
    let config = load_config(&common)?;
    let endpoint = config.engine.endpoint.clone();
    let controller = Controller::with_config(config)?;

    match controller.engine_status().await {
        Ok(message) => {
            println!("{}", message);
            Ok(())
        }
        Err(e) => {
            println!("Engine not available at {}: {}", endpoint, e);
            Err(e)
        }
    }
}

fn run_languages() -> Result<()> {
    println!("{:<8} {}", "CODE", "LANGUAGE");
    for (code, name) in language_utils::supported_languages() {
        println!("{:<8} {}", code, name);
    }
    Ok(())
}
