// Modular transcription architecture
//
// Backends implement a single capability: a prepared audio file plus a
// language hint produce the transcript text. Instances are built through
// the backend registry, so adding a service means implementing Transcriber
// and registering a factory under a new name.

pub mod local;
pub mod remote;

use async_trait::async_trait;
use futures::FutureExt;
use std::path::Path;

pub use local::LocalTranscriber;
pub use remote::RemoteTranscriber;

use crate::error::Result;
use crate::registry::BackendRegistry;

/// Main trait for transcription backends
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file to text. `language` is "auto" or a specific
    /// language code.
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String>;
}

/// Register the built-in backends. Registration order does not matter; a
/// later registration under the same name replaces the earlier one.
pub fn register_builtin_backends(registry: &BackendRegistry) {
    registry.register("remote", |config| {
        let config = config.clone();
        async move {
            let backend = RemoteTranscriber::new(config)?;
            Ok(Box::new(backend) as Box<dyn Transcriber>)
        }
        .boxed()
    });

    registry.register("local", |config| {
        let config = config.clone();
        async move {
            let backend = LocalTranscriber::new(&config).await?;
            Ok(Box::new(backend) as Box<dyn Transcriber>)
        }
        .boxed()
    });
}
