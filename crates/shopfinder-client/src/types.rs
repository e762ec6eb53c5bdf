//! Wire types for the marketplace REST backend.
//!
//! Every endpoint answers with a `{"success": bool, "data": ...}` envelope.
//! Failed calls usually carry a human-readable `message` and no `data`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Error text for a `success: false` envelope.
    #[must_use]
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "request was not successful".to_string())
    }
}
