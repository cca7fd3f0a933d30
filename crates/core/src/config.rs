use crate::error::{FramelensError, Result};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const API_KEY_FALLBACK_ENV: &str = "API_KEY";
pub const API_BASE_ENV: &str = "FRAMELENS_API_BASE";
pub const MODEL_ENV: &str = "FRAMELENS_MODEL";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Connection settings for the remote multimodal model.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl Config {
    /// Load settings from the process environment.
    ///
    /// A missing credential is fatal: callers check this before touching any
    /// input file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_ENV)
            .or_else(|| non_empty(API_KEY_FALLBACK_ENV))
            .ok_or_else(|| FramelensError::MissingApiKey {
                env_var: API_KEY_ENV.to_string(),
            })?;

        Ok(Self {
            api_key,
            api_base: non_empty(API_BASE_ENV).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: non_empty(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}
