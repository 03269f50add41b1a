use std::path::PathBuf;

use tracing::debug;

use crate::config::DEFAULT_GEMINI_MODEL;

/// Runtime settings read from the process environment.
///
/// Credentials are optional here: a missing Gemini key only fails when the
/// reasoning model is built, and a missing Tavily key just drops web search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub tavily_api_key: Option<String>,
    pub docs_dir: Option<PathBuf>,
    pub model_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the environment, after merging an optional `.env`
    /// file from the working directory.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) => debug!(error = %e, "No .env file loaded"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            google_api_key: get("GOOGLE_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            tavily_api_key: get("TAVILY_API_KEY"),
            docs_dir: get("DOCENT_DOCS_DIR").map(PathBuf::from),
            model_dir: get("DOCENT_MODEL_DIR").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup_from(&[]));
        assert_eq!(
            settings,
            Settings {
                google_api_key: None,
                gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
                tavily_api_key: None,
                docs_dir: None,
                model_dir: None,
            }
        );
    }

    #[test]
    fn reads_all_keys() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("TAVILY_API_KEY", "tvly-key"),
            ("DOCENT_DOCS_DIR", "papers"),
            ("DOCENT_MODEL_DIR", "/models"),
        ]));
        assert_eq!(settings.google_api_key.as_deref(), Some("g-key"));
        assert_eq!(settings.gemini_model, "gemini-1.5-pro");
        assert_eq!(settings.tavily_api_key.as_deref(), Some("tvly-key"));
        assert_eq!(settings.docs_dir, Some(PathBuf::from("papers")));
        assert_eq!(settings.model_dir, Some(PathBuf::from("/models")));
    }

    #[test]
    fn blank_values_are_unset() {
        let settings = Settings::from_lookup(lookup_from(&[("TAVILY_API_KEY", "  ")]));
        assert!(settings.tavily_api_key.is_none());
    }
}
