//! Vidnote - video transcription and summarization pipeline
//!
//! Turns recorded video into written summaries by extracting audio with
//! ffmpeg, transcribing it through a pluggable backend (remote API or
//! local whisper.cpp), and summarizing the transcript with a hosted LLM.

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod media;
pub mod models;
pub mod process;
pub mod registry;
pub mod summarize;
pub mod transcribe;
