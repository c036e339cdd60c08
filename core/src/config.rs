//! Configuration
//!
//! Environment-sourced configuration for the Gemini backend. A missing API
//! key is not fatal at startup: the client is constructed unconfigured and
//! every remote operation short-circuits with [`UNCONFIGURED_MESSAGE`]
//! instead of attempting the network call. This keeps the UI usable (it can
//! display the message in-band) and the core testable without credentials.

/// Default model for both the definition and art paths.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Fixed message used whenever the API key is absent. Shown in-band in the
/// definition text on the streaming path, carried as the error cause on the
/// non-streaming paths.
pub const UNCONFIGURED_MESSAGE: &str =
    "GEMINI_API_KEY is not configured. Set it in your environment to continue.";

/// Backend configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key, if present. `None` means every call short-circuits.
    pub api_key: Option<String>,
    /// Model for definitions and random words
    pub text_model: String,
    /// Model for ASCII art generation
    pub art_model: String,
    /// Topic to load on startup (optional)
    pub seed_topic: Option<String>,
}

impl GeminiConfig {
    /// Create a configuration with an explicit API key and default models
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            text_model: DEFAULT_MODEL.to_string(),
            art_model: DEFAULT_MODEL.to_string(),
            seed_topic: None,
        }
    }

    /// Create a configuration with no API key
    pub fn unconfigured() -> Self {
        Self {
            api_key: None,
            text_model: DEFAULT_MODEL.to_string(),
            art_model: DEFAULT_MODEL.to_string(),
            seed_topic: None,
        }
    }

    /// Create from environment variables
    ///
    /// Reads `GEMINI_API_KEY` (falling back to `API_KEY`), with optional
    /// model overrides `WORDRIFT_TEXT_MODEL` / `WORDRIFT_ART_MODEL` and an
    /// optional `WORDRIFT_SEED_TOPIC`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let text_model =
            std::env::var("WORDRIFT_TEXT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let art_model =
            std::env::var("WORDRIFT_ART_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let seed_topic = std::env::var("WORDRIFT_SEED_TOPIC")
            .ok()
            .filter(|t| !t.trim().is_empty());

        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; remote calls will be short-circuited");
        }

        Self {
            api_key,
            text_model,
            art_model,
            seed_topic,
        }
    }

    /// Whether an API key is present
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key() {
        let config = GeminiConfig::new("test-key");
        assert!(config.is_configured());
        assert_eq!(config.text_model, DEFAULT_MODEL);
        assert_eq!(config.art_model, DEFAULT_MODEL);
    }

    #[test]
    fn test_unconfigured() {
        let config = GeminiConfig::unconfigured();
        assert!(!config.is_configured());
    }
}
