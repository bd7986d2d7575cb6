use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Body of a non-success provider response, kept as JSON when it parses.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    Text(String),
}

impl UpstreamBody {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Read a string field when the body is a JSON object.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Json(value) => value.get(name).and_then(Value::as_str),
            Self::Text(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum IdpError {
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider returned {status}")]
    Upstream { status: StatusCode, body: UpstreamBody },
    #[error("client not found: {0}")]
    ClientNotFound(String),
    #[error("invalid identity provider response: {0}")]
    Decode(#[from] serde_json::Error),
}
