use serde_json::Value;
use thiserror::Error;

use crate::service::token_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Auth error ({status}). Please login.")]
    Auth {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Request failed: {status} {reason} - {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth { status, .. } | ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Auth { reason, .. } | ApiError::Status { reason, .. } => Some(reason),
            _ => None,
        }
    }

    fn raw_body(&self) -> Option<&str> {
        match self {
            ApiError::Auth { body, .. } | ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The `message` field of a JSON error body, if the server sent one.
    pub fn server_message(&self) -> Option<String> {
        let body: Value = serde_json::from_str(self.raw_body()?).ok()?;
        match body.get("message")? {
            Value::String(message) if !message.is_empty() => Some(message.clone()),
            _ => None,
        }
    }

    /// The error body as display text: compact JSON when it parses, raw text otherwise.
    pub fn body_text(&self) -> Option<String> {
        let raw = self.raw_body()?.trim();
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(json) => Some(json.to_string()),
            Err(_) => Some(raw.to_string()),
        }
    }

    /// Best human-readable explanation for inline display. HTTP failures show
    /// what the server said, falling back to `fallback` for empty bodies; other
    /// failures show their own description.
    pub fn describe(&self, fallback: &str) -> String {
        match self {
            ApiError::Auth { .. } | ApiError::Status { .. } => self
                .server_message()
                .or_else(|| self.body_text())
                .unwrap_or_else(|| fallback.to_string()),
            other => other.to_string(),
        }
    }
}
