use clap::Parser;
use std::path::PathBuf;

/// Generate transcripts and written summaries from video files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video file or directory of videos to process
    pub input: PathBuf,

    /// Name of the prompt file to use for summarization
    #[arg(short, long, default_value = "summarize")]
    pub prompt: String,

    /// Language of the audio (auto, en, de, es, fr); defaults to the
    /// configured language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Force rebuild of audio, transcript and summary artifacts
    #[arg(short, long)]
    pub force: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
