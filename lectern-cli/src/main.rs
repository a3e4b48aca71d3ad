//! Lectern CLI - slide decks into narrated audio lectures
//!
//! Exposes the two pipeline operations as subcommands: `scripts` turns a
//! deck into a page-delimited script document, `audio` turns that document
//! into per-page audio artifacts.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lectern::{
    AppConfig, ChatClient, DeckProcessor, Language, SynthesisOrchestrator, TtsClient,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use config::{apply_env_overrides, config_path, load_config_from, save_config_to, ConfigError};

/// Lectern - turn slide decks into narrated audio lectures
#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "LECTERN_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init(InitArgs),

    /// Generate narration scripts for every slide of a deck
    Scripts(ScriptsArgs),

    /// Synthesize per-page audio from a script document
    Audio(AudioArgs),

    /// Show configuration and credential status
    Status,
}

/// Arguments for the init command
#[derive(Args)]
struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the scripts command
#[derive(Args)]
struct ScriptsArgs {
    /// Path of the .pptx deck
    file: PathBuf,

    /// Narration language tag (zh or en)
    #[arg(short, long, default_value = "zh")]
    language: String,
}

/// Arguments for the audio command
#[derive(Args)]
struct AudioArgs {
    /// Path of the .txt script document
    file: PathBuf,
}

/// CLI error type: configuration failures or pipeline failures.
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// Configuration file handling failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A pipeline operation failed.
    #[error(transparent)]
    Pipeline(#[from] lectern::Error),
}

type Result<T> = std::result::Result<T, CliError>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lectern={level},lectern_cli={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let config_file = cli.config.unwrap_or_else(config_path);

    match cli.command {
        Commands::Init(args) => cmd_init(args, &config_file).await,
        Commands::Scripts(args) => cmd_scripts(args, &config_file).await,
        Commands::Audio(args) => cmd_audio(args, &config_file).await,
        Commands::Status => cmd_status(&config_file).await,
    }
}

/// Write a default configuration file.
async fn cmd_init(args: InitArgs, config_file: &Path) -> Result<()> {
    if config_file.exists() && !args.force {
        println!("Configuration already exists at: {}", config_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    save_config_to(&AppConfig::default(), config_file).await?;

    println!("Configuration created: {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("  1. export DEEPSEEK_API_KEY=<key>");
    println!("  2. export BAIDU_TTS_API_KEY=<key> BAIDU_TTS_SECRET_KEY=<key>");
    println!("  3. lectern scripts <deck.pptx>");

    Ok(())
}

/// Generate narration scripts for a deck.
async fn cmd_scripts(args: ScriptsArgs, config_file: &Path) -> Result<()> {
    let mut config = load_config_from(config_file).await?;
    apply_env_overrides(&mut config);

    let language = Language::parse(&args.language);
    let client = ChatClient::new(config.chat)?;
    let processor = DeckProcessor::new(&client, &config.storage, language);

    let result = processor.process(&args.file).await?;

    println!("Scripts for {} ({} pages):", args.file.display(), result.pages().len());
    for page in result.pages() {
        let marker = if page
            .speech_script
            .starts_with(&format!("Page {} generation failed:", page.page_index))
        {
            "failed"
        } else {
            "ok"
        };
        println!("  page {:>3}  {marker:>6}  {} chars", page.page_index, page.speech_script.chars().count());
    }
    println!();
    println!("Document: {}", result.document_path().display());

    Ok(())
}

/// Synthesize audio from a script document.
async fn cmd_audio(args: AudioArgs, config_file: &Path) -> Result<()> {
    let mut config = load_config_from(config_file).await?;
    apply_env_overrides(&mut config);

    let max_chunk_bytes = config.speech.max_chunk_bytes;
    let client = TtsClient::new(config.speech)?;
    let orchestrator = SynthesisOrchestrator::new(&client, &config.storage, max_chunk_bytes);

    let artifacts = orchestrator.process(&args.file).await?;

    println!("Audio for {} ({} pages):", args.file.display(), artifacts.len());
    for artifact in &artifacts {
        println!("  page {:>3}  {}", artifact.page_index, artifact.audio_path.display());
    }

    Ok(())
}

/// Show configuration and credential status.
async fn cmd_status(config_file: &Path) -> Result<()> {
    println!("Lectern Status\n");

    println!("Configuration:");
    println!("  Path:   {}", config_file.display());
    println!(
        "  Exists: {}",
        if config_file.exists() { "yes" } else { "no" }
    );

    if config_file.exists() {
        match load_config_from(config_file).await {
            Ok(config) => {
                println!("  Valid:  yes");
                println!();
                println!("Pipeline:");
                println!("  Chat model:    {}", config.chat.model);
                println!("  Voice persona: {}", config.speech.persona);
                println!("  Chunk budget:  {} bytes", config.speech.max_chunk_bytes);
                println!("  Script dir:    {}", config.storage.script_dir.display());
                println!("  Audio dir:     {}", config.storage.audio_dir.display());
            }
            Err(e) => {
                println!("  Valid:  no ({e})");
            }
        }
    }

    println!();
    println!("Environment:");
    print_env_status("DEEPSEEK_API_KEY");
    print_env_status("BAIDU_TTS_API_KEY");
    print_env_status("BAIDU_TTS_SECRET_KEY");

    Ok(())
}

/// Print environment variable status.
fn print_env_status(name: &str) {
    let status = if std::env::var(name).is_ok() {
        "set"
    } else {
        "-"
    };
    println!("  {name}: {status}");
}
