use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::Transcriber;
use crate::config::{Config, ModelEntry};
use crate::error::{Result, VidnoteError};
use crate::media;
use crate::models;

/// Local whisper.cpp transcription backend. Owns the loaded model
/// exclusively for the lifetime of one run; the native context is freed
/// when the backend is dropped.
pub struct LocalTranscriber {
    context: WhisperContext,
    model_path: PathBuf,
    ffmpeg_path: String,
}

impl LocalTranscriber {
    /// Build the backend for the configured default language. Fails
    /// immediately when the resolved model identifier has no catalog entry,
    /// or when the model file is absent and cannot be downloaded.
    pub async fn new(config: &Config) -> Result<Self> {
        let model_id = models::resolve_model(config, &config.transcription.default_language);
        let entry = models::catalog_entry(config, &model_id)?;
        let model_path = ensure_model(config, &model_id, entry).await?;

        info!("Loading whisper model from {}", model_path.display());
        let path_str = model_path.to_str().ok_or_else(|| {
            VidnoteError::Transcribe(format!("Invalid model path: {}", model_path.display()))
        })?;
        let context =
            WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
                .map_err(|e| {
                    VidnoteError::Transcribe(format!("Failed to load whisper model: {}", e))
                })?;

        Ok(Self {
            context,
            model_path,
            ffmpeg_path: config.media.binary_path.clone(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Drop for LocalTranscriber {
    fn drop(&mut self) {
        debug!("Releasing whisper model {}", self.model_path.display());
    }
}

#[async_trait]
impl Transcriber for LocalTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String> {
        let samples = media::decode_samples(&self.ffmpeg_path, audio_path).await?;
        debug!(
            "Decoded {} samples from {}",
            samples.len(),
            audio_path.display()
        );

        let mut state = self.context.create_state().map_err(|e| {
            VidnoteError::Transcribe(format!("Failed to create whisper state: {}", e))
        })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        if language != "auto" {
            params.set_language(Some(language));
        }
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(available_threads());

        state
            .full(params, &samples)
            .map_err(|e| VidnoteError::Transcribe(format!("Whisper inference failed: {}", e)))?;

        let mut transcript = String::new();
        let num_segments = state.full_n_segments();
        for seg_idx in 0..num_segments {
            let Some(segment) = state.get_segment(seg_idx) else {
                continue;
            };
            for tok_idx in 0..segment.n_tokens() {
                let Some(token) = segment.get_token(tok_idx) else {
                    continue;
                };
                let Ok(text) = token.to_str() else {
                    continue;
                };
                // Skip special tokens like [_BEG_] or <|endoftext|>.
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
                    continue;
                }
                transcript.push_str(text);
            }
            transcript.push(' ');
        }

        Ok(transcript.trim().to_string())
    }
}

/// Return the local path for a model, downloading it when absent. The
/// download writes to a temporary sibling and renames into place, so a
/// partial download is never mistaken for a model file.
async fn ensure_model(config: &Config, model_id: &str, entry: &ModelEntry) -> Result<PathBuf> {
    let model_path = match &entry.local_path {
        Some(path) => path.clone(),
        None => config
            .transcription
            .model_dir
            .join(format!("{}.bin", model_id)),
    };

    if model_path.is_file() {
        debug!(
            "Model {} already present at {}",
            model_id,
            model_path.display()
        );
        return Ok(model_path);
    }

    if let Some(parent) = model_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    info!("Downloading model {} from {}", model_id, entry.url);
    let client = reqwest::Client::builder()
        .user_agent(concat!("vidnote/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let response = client.get(&entry.url).send().await?;

    if !response.status().is_success() {
        return Err(VidnoteError::Transcribe(format!(
            "Failed to download model {}: HTTP {}",
            model_id,
            response.status()
        )));
    }

    let pb = ProgressBar::new(response.content_length().unwrap_or(0));
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap()
        .progress_chars("#>-"));

    let temp_path = model_path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await?;
    let bytes = response.bytes().await?;
    file.write_all(&bytes).await?;
    pb.set_position(bytes.len() as u64);
    file.flush().await?;
    drop(file);

    fs::rename(&temp_path, &model_path).await?;
    pb.finish_with_message(format!("Downloaded {}", model_id));
    info!("Model {} saved to {}", model_id, model_path.display());

    Ok(model_path)
}

fn available_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(4) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn construction_fails_fast_for_missing_catalog_entry() {
        let mut config = Config::default();
        config.transcription.default_language = "auto".to_string();
        config.transcription.fallback_model = "ghost-model".to_string();

        let err = LocalTranscriber::new(&config).await.err().unwrap();
        assert!(matches!(
            err,
            VidnoteError::ModelNotInCatalog(id) if id == "ghost-model"
        ));
    }

    #[tokio::test]
    async fn ensure_model_returns_existing_file_without_download() {
        let dir = tempfile::TempDir::new().unwrap();
        let model_path = dir.path().join("present.bin");
        std::fs::write(&model_path, b"model bytes").unwrap();

        let config = Config::default();
        let entry = ModelEntry {
            enabled: true,
            features: vec![crate::config::SPEECH_TO_TEXT.to_string()],
            owner: "acme".to_string(),
            // An unreachable URL proves no download is attempted.
            url: "http://localhost:1/never-fetched.bin".to_string(),
            engine: "whisper-cpp".to_string(),
            local_path: Some(model_path.clone()),
            language: None,
        };

        let resolved = ensure_model(&config, "present", &entry).await.unwrap();
        assert_eq!(resolved, model_path);
    }
}
