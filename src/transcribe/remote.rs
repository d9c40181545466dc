use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use super::Transcriber;
use crate::config::Config;
use crate::error::{Result, VidnoteError};
use crate::models;

/// JSON body returned by the transcription endpoint on success.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Remote HTTP transcription backend. Uploads the audio file to an
/// OpenAI-compatible transcription endpoint as multipart form data and
/// reads the transcript back from the JSON response. Holds no releasable
/// resources beyond the HTTP client.
pub struct RemoteTranscriber {
    config: Config,
    client: reqwest::Client,
}

impl RemoteTranscriber {
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("vidnote/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }

    /// The TRANSCRIPTION_API_URL environment variable overrides the
    /// configured endpoint.
    fn endpoint(&self) -> String {
        std::env::var("TRANSCRIPTION_API_URL")
            .unwrap_or_else(|_| self.config.transcription.endpoint.clone())
    }
}

#[async_trait]
impl Transcriber for RemoteTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String> {
        let model = models::resolve_model(&self.config, language);
        info!("Transcribing with model {} (language: {})", model, language);

        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", model);
        if language != "auto" {
            form = form.text("language", language.to_string());
        }

        let endpoint = self.endpoint();
        debug!("Sending transcription request to {}", endpoint);
        let response = self.client.post(&endpoint).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VidnoteError::Transcribe(format!(
                "Transcription request failed with status {}: {}",
                status, body
            )));
        }

        let result: TranscriptionResponse = response.json().await?;
        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transcription_response() {
        let body = r#"{"text": "hello world"}"#;
        let parsed: TranscriptionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text, "hello world");
    }

    #[tokio::test]
    async fn missing_audio_file_is_an_io_error() {
        let backend = RemoteTranscriber::new(Config::default()).unwrap();
        let err = backend
            .transcribe(Path::new("/no/such/audio.mp3"), "en")
            .await
            .unwrap_err();
        assert!(matches!(err, VidnoteError::Io(_)));
    }
}
