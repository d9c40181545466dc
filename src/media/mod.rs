// Media collaborators: ffmpeg-based audio extraction for the pipeline and
// sample decoding for local inference.

pub mod commands;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, VidnoteError};
use self::commands::MediaCommand;

/// Video container formats accepted by the pipeline.
pub const SUPPORTED_VIDEO_FORMATS: &[&str] = &["mp4", "mkv", "avi", "mov"];

pub fn is_video_file(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => SUPPORTED_VIDEO_FORMATS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Audio extraction collaborator. Implementations perform their own
/// skip-if-exists cache check and return the audio artifact path.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, video_path: &Path, force_rebuild: bool) -> Result<PathBuf>;
}

/// FFmpeg-backed extractor. The audio artifact lives next to the video,
/// same basename, mp3 extension.
pub struct FfmpegExtractor {
    binary_path: String,
}

impl FfmpegExtractor {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract(&self, video_path: &Path, force_rebuild: bool) -> Result<PathBuf> {
        if !is_video_file(video_path) {
            return Err(VidnoteError::UnsupportedFormat(
                video_path.display().to_string(),
            ));
        }

        let audio_path = video_path.with_extension("mp3");
        if !force_rebuild && audio_path.is_file() {
            info!("Audio file already exists: {}", audio_path.display());
            return Ok(audio_path);
        }

        info!("Extracting audio to {}", audio_path.display());
        MediaCommand::new(&self.binary_path, "Audio extraction")
            .input(video_path)
            .no_video()
            .audio_codec("libmp3lame")
            .audio_bitrate("192k")
            .audio_sample_rate(44100)
            .overwrite()
            .output(&audio_path)
            .execute()
            .await?;

        Ok(audio_path)
    }
}

/// Decode an audio file into 16 kHz mono f32 samples for local inference.
/// The intermediate WAV lives in a temporary directory that is removed when
/// decoding finishes.
pub async fn decode_samples(binary_path: &str, audio_path: &Path) -> Result<Vec<f32>> {
    let temp_dir = tempfile::tempdir()
        .map_err(|e| VidnoteError::Media(format!("Failed to create temp directory: {}", e)))?;
    let wav_path = temp_dir.path().join("decoded.wav");

    MediaCommand::new(binary_path, "Audio decoding")
        .input(audio_path)
        .audio_codec("pcm_s16le")
        .audio_sample_rate(16000)
        .audio_channels(1)
        .overwrite()
        .output(&wav_path)
        .execute()
        .await?;

    read_wav_samples(&wav_path)
}

fn read_wav_samples(wav_path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(wav_path)
        .map_err(|e| VidnoteError::Media(format!("Failed to read decoded audio: {}", e)))?;
    let spec = reader.spec();

    if spec.channels != 1
        || spec.sample_rate != 16000
        || spec.sample_format != hound::SampleFormat::Int
        || spec.bits_per_sample != 16
    {
        return Err(VidnoteError::Media(format!(
            "Unexpected decoded audio format: {} ch, {} Hz, {} bit",
            spec.channels, spec.sample_rate, spec.bits_per_sample
        )));
    }

    let samples: std::result::Result<Vec<f32>, _> = reader
        .samples::<i16>()
        .map(|sample| sample.map(|s| s as f32 / i16::MAX as f32))
        .collect();

    samples.map_err(|e| VidnoteError::Media(format!("Failed to decode audio samples: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn recognizes_supported_video_extensions() {
        assert!(is_video_file(Path::new("talk.mp4")));
        assert!(is_video_file(Path::new("talk.MKV")));
        assert!(is_video_file(Path::new("/videos/talk.mov")));
        assert!(!is_video_file(Path::new("talk.mp3")));
        assert!(!is_video_file(Path::new("talk.txt")));
        assert!(!is_video_file(Path::new("talk")));
    }

    #[tokio::test]
    async fn extract_rejects_unsupported_format() {
        let extractor = FfmpegExtractor::new("ffmpeg");
        let err = extractor
            .extract(Path::new("notes.txt"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, VidnoteError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn extract_skips_when_audio_exists() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("talk.mp4");
        let audio = dir.path().join("talk.mp3");
        std::fs::write(&video, b"fake video").unwrap();
        std::fs::write(&audio, b"fake audio").unwrap();

        // The binary does not exist, so reaching ffmpeg would fail loudly.
        let extractor = FfmpegExtractor::new("vidnote-no-such-binary");
        let result = extractor.extract(&video, false).await.unwrap();
        assert_eq!(result, audio);
    }

    #[tokio::test]
    async fn force_rebuild_bypasses_audio_cache() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("talk.mp4");
        let audio = dir.path().join("talk.mp3");
        std::fs::write(&video, b"fake video").unwrap();
        std::fs::write(&audio, b"fake audio").unwrap();

        let extractor = FfmpegExtractor::new("vidnote-no-such-binary");
        let err = extractor.extract(&video, true).await.unwrap_err();
        assert!(matches!(err, VidnoteError::Media(_)));
    }

    #[test]
    fn reads_16k_mono_wav_samples() {
        let dir = TempDir::new().unwrap();
        let wav_path = dir.path().join("decoded.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&wav_path, spec).unwrap();
        for value in [0i16, i16::MAX, i16::MIN / 2] {
            writer.write_sample(value).unwrap();
        }
        writer.finalize().unwrap();

        let samples = read_wav_samples(&wav_path).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], 1.0);
        assert!(samples[2] < 0.0);
    }

    #[test]
    fn rejects_unexpected_wav_format() {
        let dir = TempDir::new().unwrap();
        let wav_path = dir.path().join("stereo.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&wav_path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        let err = read_wav_samples(&wav_path).unwrap_err();
        assert!(matches!(err, VidnoteError::Media(_)));
    }
}
