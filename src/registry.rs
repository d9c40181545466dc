use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::Config;
use crate::error::{Result, VidnoteError};
use crate::transcribe::Transcriber;

/// Factory that builds a transcription backend instance from configuration.
/// Construction is async because some backends fetch their model first.
pub type BackendFactory =
    Arc<dyn Fn(&Config) -> BoxFuture<'static, Result<Box<dyn Transcriber>>> + Send + Sync>;

/// Mapping from backend name to factory. Constructed once at startup and
/// passed to whatever builds the processor; lookups are safe concurrently
/// with registration.
pub struct BackendRegistry {
    backends: RwLock<HashMap<String, BackendFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: RwLock::new(HashMap::new()),
        }
    }

    /// Register a backend under `name`. A later registration under the same
    /// name silently replaces the earlier one; test doubles rely on this.
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn(&Config) -> BoxFuture<'static, Result<Box<dyn Transcriber>>>
            + Send
            + Sync
            + 'static,
    {
        let mut backends = self.backends.write().expect("backend registry poisoned");
        backends.insert(name.to_string(), Arc::new(factory));
    }

    /// Build a backend instance by name. The factory runs outside the lock,
    /// and its construction errors pass through unchanged.
    pub async fn get(&self, name: &str, config: &Config) -> Result<Box<dyn Transcriber>> {
        let factory = {
            let backends = self.backends.read().expect("backend registry poisoned");
            backends.get(name).cloned()
        };

        match factory {
            Some(factory) => factory(config).await,
            None => Err(VidnoteError::UnknownBackend(name.to_string())),
        }
    }

    /// Registered backend names, sorted for stable diagnostics.
    pub fn names(&self) -> Vec<String> {
        let backends = self.backends.read().expect("backend registry poisoned");
        let mut names: Vec<String> = backends.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::FutureExt;
    use std::path::Path;

    struct StaticTranscriber {
        text: &'static str,
    }

    #[async_trait]
    impl Transcriber for StaticTranscriber {
        async fn transcribe(&self, _audio_path: &Path, _language: &str) -> Result<String> {
            Ok(self.text.to_string())
        }
    }

    fn static_factory(
        text: &'static str,
    ) -> impl Fn(&Config) -> BoxFuture<'static, Result<Box<dyn Transcriber>>> {
        move |_config| {
            async move { Ok(Box::new(StaticTranscriber { text }) as Box<dyn Transcriber>) }.boxed()
        }
    }

    #[tokio::test]
    async fn unknown_backend_is_an_error() {
        let registry = BackendRegistry::new();
        let config = Config::default();

        let err = registry.get("missing", &config).await.err().unwrap();
        assert!(matches!(
            err,
            VidnoteError::UnknownBackend(name) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn registered_backend_is_built() {
        let registry = BackendRegistry::new();
        let config = Config::default();
        registry.register("stub", static_factory("stub result"));

        let backend = registry.get("stub", &config).await.unwrap();
        let text = backend.transcribe(Path::new("a.mp3"), "en").await.unwrap();
        assert_eq!(text, "stub result");
    }

    #[tokio::test]
    async fn re_registration_overwrites_silently() {
        let registry = BackendRegistry::new();
        let config = Config::default();
        registry.register("stub", static_factory("first"));
        registry.register("stub", static_factory("second"));

        let backend = registry.get("stub", &config).await.unwrap();
        let text = backend.transcribe(Path::new("a.mp3"), "en").await.unwrap();
        assert_eq!(text, "second");
        assert_eq!(registry.names(), vec!["stub".to_string()]);
    }

    #[tokio::test]
    async fn factory_construction_errors_pass_through() {
        let registry = BackendRegistry::new();
        let config = Config::default();
        registry.register("broken", |_config| {
            async {
                Err::<Box<dyn Transcriber>, _>(VidnoteError::ModelNotInCatalog(
                    "ghost-model".to_string(),
                ))
            }
            .boxed()
        });

        let err = registry.get("broken", &config).await.err().unwrap();
        assert!(matches!(
            err,
            VidnoteError::ModelNotInCatalog(id) if id == "ghost-model"
        ));
    }
}
