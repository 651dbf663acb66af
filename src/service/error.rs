use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One machine-readable entry of a REST error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ServiceMessage {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.text)
    }
}

#[derive(Deserialize)]
struct ResponseBody {
    messages: Vec<ServiceMessage>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service answered with a list of typed messages
    #[error("{}", join_messages(.0))]
    Structured(Vec<ServiceMessage>),

    /// Anything else (transport, storage, unexpected payloads)
    #[error("{0}")]
    Opaque(String),
}

impl ServiceError {
    pub fn opaque(message: impl Into<String>) -> Self {
        ServiceError::Opaque(message.into())
    }

    /// Build an error from a REST response body.
    ///
    /// Bodies of the form `{"messages": [{"type": ..., "text": ...}]}` become
    /// `Structured`; any other body is kept verbatim as `Opaque`.
    pub fn from_response_body(body: &str) -> Self {
        match serde_json::from_str::<ResponseBody>(body) {
            Ok(parsed) if !parsed.messages.is_empty() => ServiceError::Structured(parsed.messages),
            _ => ServiceError::Opaque(body.to_string()),
        }
    }

    /// Human-readable lines, one per message
    pub fn display_messages(&self) -> Vec<String> {
        match self {
            ServiceError::Structured(messages) => messages.iter().map(ToString::to_string).collect(),
            ServiceError::Opaque(message) => vec![message.clone()],
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Opaque(format!("IO error: {}", e))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Opaque(format!("JSON error: {}", e))
    }
}

fn join_messages(messages: &[ServiceMessage]) -> String {
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
