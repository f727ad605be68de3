//! Provider configuration with the defaults mentor responses are tuned for.
//!
//! [`MentorConfig`] is built once at startup and handed to
//! [`GeminiClient::new`](crate::GeminiClient::new). Nothing else in the crate
//! reads the environment, so a missing credential surfaces here, before any
//! request is served.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MentorError;
use crate::{API_KEY_ENV, DEFAULT_MODEL, GEMINI_BASE_URL};

/// Environment variable overriding [`MentorConfig::model`].
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Environment variable overriding [`MentorConfig::base_url`].
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Fixed sampling parameters for every mentor request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Sampling temperature. Default: `0.7`.
    pub temperature: f32,
    /// Nucleus-sampling cutoff. Default: `0.9`.
    pub top_p: f32,
    /// Top-k sampling. Default: `40`.
    pub top_k: u32,
    /// Maximum output length in tokens. Default: `1024`.
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

/// Content-filter threshold applied to every harm category.
///
/// Ordered from least to most restrictive.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    /// Block only high-probability harm. Mentor role-play runs here.
    #[default]
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

impl std::str::FromStr for HarmBlockThreshold {
    type Err = MentorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "BLOCK_NONE" | "NONE" => Ok(Self::BlockNone),
            "BLOCK_ONLY_HIGH" | "ONLY_HIGH" | "HIGH" => Ok(Self::BlockOnlyHigh),
            "BLOCK_MEDIUM_AND_ABOVE" | "MEDIUM" => Ok(Self::BlockMediumAndAbove),
            "BLOCK_LOW_AND_ABOVE" | "LOW" => Ok(Self::BlockLowAndAbove),
            other => Err(MentorError::Configuration(format!(
                "unknown safety threshold '{other}'"
            ))),
        }
    }
}

/// Everything the model gateway needs to talk to the provider.
#[derive(Clone)]
pub struct MentorConfig {
    /// Provider credential. Required.
    pub api_key: String,
    /// Model identifier. Default: `"gemini-1.5-flash"`.
    pub model: String,
    /// API base URL. Default: the public v1beta endpoint.
    pub base_url: String,
    pub generation: GenerationSettings,
    /// Default: [`HarmBlockThreshold::BlockOnlyHigh`].
    pub safety_threshold: HarmBlockThreshold,
    /// HTTP client timeout for one provider call. Default: 120 s.
    pub http_timeout: Duration,
}

impl std::fmt::Debug for MentorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MentorConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("generation", &self.generation)
            .field("safety_threshold", &self.safety_threshold)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl MentorConfig {
    /// Config with defaults and the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            generation: GenerationSettings::default(),
            safety_threshold: HarmBlockThreshold::default(),
            http_timeout: Duration::from_secs(120),
        }
    }

    /// Load from the process environment, after merging `./.env` if present.
    pub fn from_env() -> Result<Self, MentorError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a dotenv-style file only, without touching the process
    /// environment.
    pub fn from_dotenv_file(path: &Path) -> Result<Self, MentorError> {
        let entries = dotenvy::from_path_iter(path)
            .map_err(|e| {
                MentorError::Configuration(format!("failed to read {}: {e}", path.display()))
            })?
            .collect::<Result<HashMap<String, String>, _>>()
            .map_err(|e| {
                MentorError::Configuration(format!("failed to parse {}: {e}", path.display()))
            })?;
        Self::from_lookup(|key| entries.get(key).cloned())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// The credential must be present and non-blank. Model and base URL fall
    /// back to their defaults when unset or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MentorError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_blank(API_KEY_ENV).ok_or_else(|| {
            MentorError::Configuration(format!("{API_KEY_ENV} not found in environment variables"))
        })?;

        let mut config = Self::new(api_key.trim());
        if let Some(model) = non_blank(MODEL_ENV) {
            config.model = model.trim().to_string();
        }
        if let Some(url) = non_blank(BASE_URL_ENV) {
            config.base_url = url.trim().to_string();
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_safety_threshold(mut self, threshold: HarmBlockThreshold) -> Self {
        self.safety_threshold = threshold;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_mentor_tuning() {
        let config = MentorConfig::new("key");
        assert!((config.generation.temperature - 0.7).abs() < f32::EPSILON);
        assert!((config.generation.top_p - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.generation.max_output_tokens, 1024);
        assert_eq!(config.safety_threshold, HarmBlockThreshold::BlockOnlyHigh);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let err = MentorConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, MentorError::Configuration(ref m) if m.contains(API_KEY_ENV)));
    }

    #[test]
    fn blank_key_is_configuration_error() {
        let result = MentorConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "  ")]));
        assert!(matches!(result, Err(MentorError::Configuration(_))));
    }

    #[test]
    fn overrides_are_applied() {
        let config = MentorConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "abc"),
            (MODEL_ENV, "gemini-2.0-flash"),
            (BASE_URL_ENV, "http://localhost:9999"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, "http://localhost:9999");
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", MentorConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn dotenv_file_is_read_without_touching_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{API_KEY_ENV}=from-file").unwrap();
        writeln!(file, "{MODEL_ENV}=gemini-test").unwrap();
        let config = MentorConfig::from_dotenv_file(file.path()).unwrap();
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.model, "gemini-test");
    }

    #[test]
    fn threshold_parses_short_and_long_names() {
        assert_eq!(
            "block_none".parse::<HarmBlockThreshold>().unwrap(),
            HarmBlockThreshold::BlockNone
        );
        assert_eq!(
            "medium".parse::<HarmBlockThreshold>().unwrap(),
            HarmBlockThreshold::BlockMediumAndAbove
        );
        assert!("strict".parse::<HarmBlockThreshold>().is_err());
    }
}
