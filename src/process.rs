use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{Result, VidnoteError};
use crate::files;
use crate::media::{self, AudioExtractor};
use crate::summarize::Summarizer;
use crate::transcribe::Transcriber;

/// Suffix of the transcript artifact; the summary artifact uses the prompt
/// name as its suffix.
pub const TRANSCRIPT_SUFFIX: &str = "transcript";

/// Per-invocation processing options, fixed for the duration of one video.
#[derive(Debug, Clone)]
pub struct Options {
    pub language: String,
    pub prompt_name: String,
    pub force_rebuild: bool,
}

/// Orchestrates the per-video pipeline: validate, extract audio,
/// transcribe, summarize. A stage is skipped when its artifact already
/// exists and `force_rebuild` is off; artifacts are never deleted, so a
/// leftover transcript from a failed run becomes a cache hit on the next.
pub struct Processor {
    extractor: Box<dyn AudioExtractor>,
    transcriber: Box<dyn Transcriber>,
    summarizer: Box<dyn Summarizer>,
}

impl Processor {
    pub fn new(
        extractor: Box<dyn AudioExtractor>,
        transcriber: Box<dyn Transcriber>,
        summarizer: Box<dyn Summarizer>,
    ) -> Self {
        Self {
            extractor,
            transcriber,
            summarizer,
        }
    }

    /// Process a single video file, generating transcript and summary
    /// artifacts next to it. Any stage error aborts this video only.
    pub async fn process_video(&self, video_path: &Path, opts: &Options) -> Result<()> {
        if !media::is_video_file(video_path) {
            return Err(VidnoteError::UnsupportedFormat(
                video_path.display().to_string(),
            ));
        }

        let audio_path = self.extractor.extract(video_path, opts.force_rebuild).await?;

        let transcript_path = files::output_path(video_path, TRANSCRIPT_SUFFIX);
        if !opts.force_rebuild && files::file_exists(&transcript_path) {
            info!("Transcript already exists: {}", transcript_path.display());
        } else {
            let text = self
                .transcriber
                .transcribe(&audio_path, &opts.language)
                .await?;
            files::write_file(&transcript_path, text.as_bytes()).await?;
            info!("Transcript saved to: {}", transcript_path.display());
        }

        let summary_path = files::output_path(video_path, &opts.prompt_name);
        if !opts.force_rebuild && files::file_exists(&summary_path) {
            info!("Summary already exists: {}", summary_path.display());
            return Ok(());
        }

        // Read the transcript back from disk so the cache-hit and
        // cache-miss paths feed the summarizer identically.
        let transcript = files::read_file(&transcript_path).await?;
        let summary = self
            .summarizer
            .summarize(&transcript, &opts.prompt_name, opts.force_rebuild)
            .await?;
        files::write_file(&summary_path, summary.as_bytes()).await?;
        info!("Summary saved to: {}", summary_path.display());

        Ok(())
    }

    /// Process every supported video directly inside `dir`, strictly
    /// sequentially. One video's failure does not stop the remaining
    /// videos.
    pub async fn process_directory(&self, dir: &Path, opts: &Options) -> Result<()> {
        let mut found = false;
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !media::is_video_file(path) {
                continue;
            }
            found = true;
            match self.process_video(path, opts).await {
                Ok(()) => info!("Finished processing: {}", path.display()),
                Err(e) => warn!("Failed to process {}: {}", path.display(), e),
            }
        }

        if !found {
            return Err(VidnoteError::FileNotFound(format!(
                "No supported video files found in directory: {}",
                dir.display()
            )));
        }
        Ok(())
    }
}
