//! Vidnote - video transcription and summarization pipeline
//!
//! This is the main entry point for the vidnote application, which turns
//! recorded video into written summaries using ffmpeg, a pluggable
//! transcription backend (remote API or local whisper.cpp), and a hosted
//! LLM for summarization.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vidnote::cli::Args;
use vidnote::config::Config;
use vidnote::media::FfmpegExtractor;
use vidnote::models;
use vidnote::process::{Options, Processor};
use vidnote::registry::BackendRegistry;
use vidnote::summarize::ChatSummarizer;
use vidnote::transcribe::register_builtin_backends;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration, bootstrapping defaults on first run
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::load_or_init("config.toml")?,
    };

    // Resolve and validate the processing language
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| config.transcription.default_language.clone());
    if !models::is_supported_language(&language) {
        anyhow::bail!(
            "invalid language: {} (supported: {})",
            language,
            models::SUPPORTED_LANGUAGES.join(", ")
        );
    }

    // The prompt file must exist before any expensive stage runs
    let prompt_path = config.summarize.prompt_dir.join(&args.prompt);
    if !prompt_path.is_file() {
        anyhow::bail!("prompt file does not exist: {}", prompt_path.display());
    }

    // Build the backend registry and resolve the configured backend
    let registry = BackendRegistry::new();
    register_builtin_backends(&registry);

    info!(
        "Using transcription backend: {}",
        config.transcription.backend
    );
    let transcriber = registry.get(&config.transcription.backend, &config).await?;
    let summarizer = ChatSummarizer::new(&config)?;
    let extractor = FfmpegExtractor::new(&config.media.binary_path);

    let processor = Processor::new(Box::new(extractor), transcriber, Box::new(summarizer));

    let opts = Options {
        language,
        prompt_name: args.prompt.clone(),
        force_rebuild: args.force,
    };

    info!("Processing input: {}", args.input.display());
    info!("Using language: {}", opts.language);
    info!("Using prompt: {}", opts.prompt_name);
    info!("Force rebuild: {}", opts.force_rebuild);

    if args.input.is_dir() {
        processor.process_directory(&args.input, &opts).await?;
    } else {
        processor.process_video(&args.input, &opts).await?;
    }

    info!("Processing completed successfully");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".vidnote").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "vidnote.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer().with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_ansi(false);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
