use std::fmt;
use std::time::Duration;

use crate::{Error, Result};

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const SERPER_API_KEY_VAR: &str = "SERPER_API_KEY";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const SERPER_BASE_URL_VAR: &str = "SERPER_BASE_URL";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SERPER_BASE_URL: &str = "https://google.serper.dev";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Everything the pipeline needs from its environment, resolved once at startup.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub serper_api_key: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub openai_base_url: String,
    pub serper_base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("serper_api_key", &"<redacted>")
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("openai_base_url", &self.openai_base_url)
            .field("serper_base_url", &self.serper_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    pub fn new(openai_api_key: impl Into<String>, serper_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            serper_api_key: serper_api_key.into(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            serper_base_url: DEFAULT_SERPER_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(60),
            user_agent: concat!("newsletter/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Config::from_env`], but `OPENAI_API_KEY` may be absent when
    /// `require_openai_key` is false (offline models never call OpenAI).
    pub fn from_env_with(require_openai_key: bool) -> Result<Self> {
        Self::from_lookup_with(|name| std::env::var(name).ok(), require_openai_key)
    }

    /// Builds a config from an arbitrary variable source and validates it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with(lookup, true)
    }

    pub fn from_lookup_with<F>(lookup: F, require_openai_key: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required =
            |name: &str| present(name).ok_or_else(|| Error::MissingCredential(name.to_string()));

        let openai_api_key = if require_openai_key {
            required(OPENAI_API_KEY_VAR)?
        } else {
            present(OPENAI_API_KEY_VAR).unwrap_or_default()
        };
        let mut config = Self::new(openai_api_key, required(SERPER_API_KEY_VAR)?);
        if let Some(url) = lookup(OPENAI_BASE_URL_VAR) {
            config.openai_base_url = url;
        }
        if let Some(url) = lookup(SERPER_BASE_URL_VAR) {
            config.serper_base_url = url;
        }
        config.validate_with(require_openai_key)?;
        Ok(config)
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = url.into();
        self
    }

    pub fn with_serper_base_url(mut self, url: impl Into<String>) -> Self {
        self.serper_base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_with(true)
    }

    pub fn validate_with(&self, require_openai_key: bool) -> Result<()> {
        if require_openai_key && self.openai_api_key.trim().is_empty() {
            return Err(Error::MissingCredential(OPENAI_API_KEY_VAR.to_string()));
        }
        if self.serper_api_key.trim().is_empty() {
            return Err(Error::MissingCredential(SERPER_API_KEY_VAR.to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        for (name, url) in [
            ("OpenAI base URL", &self.openai_base_url),
            ("Serper base URL", &self.serper_base_url),
        ] {
            url::Url::parse(url)
                .map_err(|e| Error::Config(format!("{} {:?} is invalid: {}", name, url, e)))?;
        }
        if self.chat_model.is_empty() || self.embedding_model.is_empty() {
            return Err(Error::Config("model names must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_openai_key_fails_fast() {
        let result = Config::from_lookup(lookup_from(&[(SERPER_API_KEY_VAR, "serper")]));
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "missing credential: OPENAI_API_KEY");
    }

    #[test]
    fn test_blank_serper_key_is_missing() {
        let result = Config::from_lookup(lookup_from(&[
            (OPENAI_API_KEY_VAR, "sk-test"),
            (SERPER_API_KEY_VAR, "  "),
        ]));
        assert!(matches!(result, Err(Error::MissingCredential(name)) if name == SERPER_API_KEY_VAR));
    }

    #[test]
    fn test_from_lookup_with_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (OPENAI_API_KEY_VAR, "sk-test"),
            (SERPER_API_KEY_VAR, "serper"),
            (OPENAI_BASE_URL_VAR, "http://localhost:8080/v1"),
        ]))
        .unwrap();
        assert_eq!(config.openai_base_url, "http://localhost:8080/v1");
        assert_eq!(config.serper_base_url, DEFAULT_SERPER_BASE_URL);
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn test_openai_key_optional_for_offline_models() {
        let config =
            Config::from_lookup_with(lookup_from(&[(SERPER_API_KEY_VAR, "serper")]), false).unwrap();
        assert!(config.openai_api_key.is_empty());
        assert!(config.validate().is_err());

        let result = Config::from_lookup_with(lookup_from(&[(OPENAI_API_KEY_VAR, "sk")]), false);
        assert!(matches!(result, Err(Error::MissingCredential(name)) if name == SERPER_API_KEY_VAR));
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let config = Config::new("sk", "serper").with_temperature(3.5);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = Config::new("sk-secret", "serper-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("serper-secret"));
    }
}
