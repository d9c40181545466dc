use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidnoteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported video format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown transcription backend: {0}")]
    UnknownBackend(String),

    #[error("Model {0} not found in catalog")]
    ModelNotInCatalog(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Transcription error: {0}")]
    Transcribe(String),

    #[error("Summarization error: {0}")]
    Summarize(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, VidnoteError>;
