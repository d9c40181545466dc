use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, VidnoteError};

/// Capability tag marking a catalog entry as usable for transcription.
pub const SPEECH_TO_TEXT: &str = "speech-to-text";

/// Name of the prompt written on first run.
pub const DEFAULT_PROMPT_NAME: &str = "summarize";

const DEFAULT_PROMPT: &str = "Create a detailed summary of the following meeting transcript. \
Structure the summary according to the main topics discussed and organize the information \
into logical sections. For each topic, summarize who was involved, what was discussed in \
detail, what decisions were made, what problems or challenges were identified, and what \
solutions were proposed or implemented.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub transcription: TranscriptionConfig,
    pub summarize: SummarizeConfig,
    pub media: MediaConfig,
    /// Speech model catalog, keyed by model identifier. A BTreeMap keeps
    /// language resolution deterministic when entries share an affinity.
    #[serde(default)]
    pub catalog: BTreeMap<String, ModelEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Selected transcription backend ("remote" or "local")
    pub backend: String,
    /// Remote transcription API endpoint
    pub endpoint: String,
    /// Language used when none is given on the command line
    pub default_language: String,
    /// Universal model for "auto" and languages without a dedicated entry
    pub fallback_model: String,
    /// Directory where local model files are stored
    pub model_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeConfig {
    /// Chat completion endpoint
    pub endpoint: String,
    /// Chat model identifier
    pub model: String,
    /// Directory holding named prompt files
    pub prompt_dir: PathBuf,
    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
}

/// A speech model descriptor. Identifier uniqueness is assumed, not
/// validated beyond map semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Whether this entry may be selected
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Capability tags, e.g. "speech-to-text"
    #[serde(default)]
    pub features: Vec<String>,
    /// Owning organization
    pub owner: String,
    /// Retrieval URL for the model file
    pub url: String,
    /// Inference engine name
    pub engine: String,
    /// Storage path override; defaults to {model_dir}/{id}.bin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    /// Language affinity; entries without one are universal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        let mut catalog = BTreeMap::new();
        catalog.insert(
            "whisper-base-en".to_string(),
            ModelEntry {
                enabled: true,
                features: vec![SPEECH_TO_TEXT.to_string()],
                owner: "ggerganov".to_string(),
                url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin"
                    .to_string(),
                engine: "whisper-cpp".to_string(),
                local_path: None,
                language: Some("en".to_string()),
            },
        );
        catalog.insert(
            "whisper-large-v3".to_string(),
            ModelEntry {
                enabled: true,
                features: vec![SPEECH_TO_TEXT.to_string()],
                owner: "ggerganov".to_string(),
                url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-large-v3.bin"
                    .to_string(),
                engine: "whisper-cpp".to_string(),
                local_path: None,
                language: None,
            },
        );

        Self {
            transcription: TranscriptionConfig {
                backend: "remote".to_string(),
                endpoint: "http://localhost:8000/v1/audio/transcriptions".to_string(),
                default_language: "auto".to_string(),
                fallback_model: "whisper-large-v3".to_string(),
                model_dir: PathBuf::from(".vidnote/models"),
            },
            summarize: SummarizeConfig {
                endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4o".to_string(),
                prompt_dir: PathBuf::from(".vidnote/prompts"),
                api_key: None,
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
            },
            catalog,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VidnoteError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| VidnoteError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VidnoteError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| VidnoteError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load the configuration, writing defaults on first run. Existing files
    /// are never overwritten.
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Config::default();
            config.save_to_file(path)?;
            info!("Wrote default configuration to {}", path.display());
        }

        let config = Config::from_file(path)?;
        config.ensure_default_prompt()?;
        Ok(config)
    }

    /// Create the prompt directory and the default summarization prompt if
    /// they do not exist yet.
    pub fn ensure_default_prompt(&self) -> Result<()> {
        let prompt_path = self.summarize.prompt_dir.join(DEFAULT_PROMPT_NAME);
        if prompt_path.exists() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.summarize.prompt_dir)
            .map_err(|e| VidnoteError::Config(format!("Failed to create prompt directory: {}", e)))?;
        std::fs::write(&prompt_path, DEFAULT_PROMPT)
            .map_err(|e| VidnoteError::Config(format!("Failed to write default prompt: {}", e)))?;
        info!("Wrote default prompt to {}", prompt_path.display());
        Ok(())
    }
}
