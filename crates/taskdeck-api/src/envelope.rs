//! JSON failure envelopes produced by the gateway's proxy routes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rich failure envelope used by the identifier-validated task routes.
/// `data` is always present and always null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: Option<Value>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
            data: None,
        }
    }

    /// The 400 body for a missing, placeholder, or non-numeric identifier.
    pub fn invalid_id() -> Self {
        Self::new("Invalid ID format", "ID must be a valid number")
    }

    /// The 500 body for an unexpected failure while proxying.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new("Internal server error", detail)
    }
}

/// Plain failure body used by the passthrough routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureMessage {
    pub message: String,
}

impl FailureMessage {
    pub fn internal() -> Self {
        Self {
            message: "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalid_id_envelope_matches_the_wire_shape() {
        let value = serde_json::to_value(ErrorEnvelope::invalid_id()).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "message": "Invalid ID format",
                "error": "ID must be a valid number",
                "data": null
            })
        );
    }

    #[test]
    fn plain_failure_has_only_a_message() {
        let value = serde_json::to_value(FailureMessage::internal()).unwrap();
        assert_eq!(value, json!({"message": "Internal server error"}));
    }
}
