use crate::config::{Config, ModelEntry, SPEECH_TO_TEXT};
use crate::error::{Result, VidnoteError};

/// Language codes accepted on the command line and in configuration.
pub const SUPPORTED_LANGUAGES: &[&str] = &["auto", "en", "de", "es", "fr"];

pub fn is_supported_language(lang: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&lang)
}

/// Resolve the model identifier for a language.
///
/// A language with a dedicated catalog entry (enabled, speech-to-text
/// capable, matching affinity) resolves to that entry. "auto" and every
/// language without a dedicated entry resolve to the configured fallback
/// model. Pure function of the configuration; never fails for a supported
/// language.
pub fn resolve_model(config: &Config, language: &str) -> String {
    if language != "auto" {
        for (id, entry) in &config.catalog {
            if entry.enabled
                && entry.language.as_deref() == Some(language)
                && entry.features.iter().any(|f| f == SPEECH_TO_TEXT)
            {
                return id.clone();
            }
        }
    }
    config.transcription.fallback_model.clone()
}

/// Look up a catalog entry by identifier. A miss here means the
/// configuration is internally inconsistent, not that the caller passed a
/// bad language.
pub fn catalog_entry<'a>(config: &'a Config, id: &str) -> Result<&'a ModelEntry> {
    config
        .catalog
        .get(id)
        .ok_or_else(|| VidnoteError::ModelNotInCatalog(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_entry_wins_for_english() {
        let config = Config::default();
        assert_eq!(resolve_model(&config, "en"), "whisper-base-en");
    }

    #[test]
    fn auto_and_unmapped_languages_use_fallback() {
        let config = Config::default();
        assert_eq!(resolve_model(&config, "auto"), "whisper-large-v3");
        assert_eq!(resolve_model(&config, "de"), "whisper-large-v3");
        assert_eq!(resolve_model(&config, "fr"), "whisper-large-v3");
    }

    #[test]
    fn resolution_is_deterministic() {
        let config = Config::default();
        for lang in SUPPORTED_LANGUAGES {
            assert_eq!(resolve_model(&config, lang), resolve_model(&config, lang));
        }
    }

    #[test]
    fn disabled_entries_are_skipped() {
        let mut config = Config::default();
        config
            .catalog
            .get_mut("whisper-base-en")
            .unwrap()
            .enabled = false;
        assert_eq!(resolve_model(&config, "en"), "whisper-large-v3");
    }

    #[test]
    fn entries_without_capability_are_skipped() {
        let mut config = Config::default();
        config
            .catalog
            .get_mut("whisper-base-en")
            .unwrap()
            .features
            .clear();
        assert_eq!(resolve_model(&config, "en"), "whisper-large-v3");
    }

    #[test]
    fn missing_catalog_entry_is_an_integrity_error() {
        let config = Config::default();
        let err = catalog_entry(&config, "no-such-model").unwrap_err();
        assert!(matches!(
            err,
            VidnoteError::ModelNotInCatalog(id) if id == "no-such-model"
        ));
    }

    #[test]
    fn resolved_identifiers_exist_in_default_catalog() {
        let config = Config::default();
        for lang in SUPPORTED_LANGUAGES {
            let id = resolve_model(&config, lang);
            assert!(catalog_entry(&config, &id).is_ok(), "no entry for {}", id);
        }
    }
}
