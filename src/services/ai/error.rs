use serde::{Deserialize, Serialize};

/// Failure of a single provider attempt. Every variant is recoverable by
/// rotating to another key while untried keys remain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BackendError {
    Network { message: String },
    Api { status: u16, message: String },
    Parse { message: String },
}

impl BackendError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Network { message } | Self::Parse { message } => message,
            Self::Api { message, .. } => message,
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { message } => write!(f, "Network: {}", message),
            Self::Api { status, message } => write!(f, "HTTP {}: {}", status, message),
            Self::Parse { message } => write!(f, "Parse: {}", message),
        }
    }
}

impl std::error::Error for BackendError {}

/// Terminal outcome of a dispatch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DispatchError {
    /// No key configured at all; no network call was attempted.
    MissingKey { message: String },
    /// Invalid input rejected before any attempt.
    InvalidInput { message: String },
    /// Every configured key was tried once and failed.
    Exhausted { attempts: usize, last: BackendError },
}

impl DispatchError {
    pub fn missing_key() -> Self {
        Self::MissingKey {
            message: "SYSTEM_ERROR: API KEY MISSING".to_string(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn exhausted(attempts: usize, last: BackendError) -> Self {
        Self::Exhausted { attempts, last }
    }

    /// The string shown in the frontend's error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingKey { message } | Self::InvalidInput { message } => message.clone(),
            Self::Exhausted { last, .. } => format!("ENGINE_ERROR: {}", last.message()),
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for DispatchError {}
