use thiserror::Error;

#[derive(Error, Debug)]
pub enum FramelensError {
    #[error("Malformed media payload: {reason}")]
    Format { reason: String },

    #[error("Unsupported file type {mime_type}: please upload a video file")]
    Validation { mime_type: String },

    #[error("Analysis request failed: {reason}")]
    RemoteCall { reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("An analysis is already in progress")]
    Busy,

    #[error("Invalid session transition: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FramelensError {
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    pub fn remote(reason: impl Into<String>) -> Self {
        Self::RemoteCall {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for FramelensError {
    fn from(err: reqwest::Error) -> Self {
        Self::remote(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FramelensError>;
