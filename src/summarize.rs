use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, VidnoteError};

/// Summarization collaborator contract. `force_rebuild` is part of the
/// interface even when an implementation keeps no cache of its own.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        transcript: &str,
        prompt_name: &str,
        force_rebuild: bool,
    ) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Summarizer backed by an OpenAI-compatible chat completion API. The named
/// prompt file becomes the system message, the transcript the user message.
pub struct ChatSummarizer {
    endpoint: String,
    model: String,
    prompt_dir: PathBuf,
    api_key: String,
    client: reqwest::Client,
}

impl ChatSummarizer {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .summarize
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                VidnoteError::Config(
                    "No summarization API key: set summarize.api_key or OPENAI_API_KEY".to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("vidnote/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: config.summarize.endpoint.clone(),
            model: config.summarize.model.clone(),
            prompt_dir: config.summarize.prompt_dir.clone(),
            api_key,
            client,
        })
    }

    async fn load_prompt(&self, prompt_name: &str) -> Result<String> {
        let prompt_path = self.prompt_dir.join(prompt_name);
        tokio::fs::read_to_string(&prompt_path).await.map_err(|e| {
            VidnoteError::Summarize(format!(
                "Failed to read prompt file {}: {}",
                prompt_path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(
        &self,
        transcript: &str,
        prompt_name: &str,
        _force_rebuild: bool,
    ) -> Result<String> {
        let prompt = self.load_prompt(prompt_name).await?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: transcript.to_string(),
                },
            ],
        };

        debug!("Sending summarization request to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VidnoteError::Summarize(format!(
                "Summarization request failed with status {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response.json().await?;
        let choice = result.choices.into_iter().next().ok_or_else(|| {
            VidnoteError::Summarize("No response choices returned from API".to_string())
        })?;

        Ok(choice.message.content)
    }
}
