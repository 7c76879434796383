//! The `{success, data, error}` envelope every endpoint returns.

use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Standard response wrapper.
///
/// The HTTP layer deserializes the envelope but never unwraps it; each
/// store decides what a failure means for its caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Error detail inside a failed envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope carrying an error message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorInfo {
                message: message.into(),
                code: None,
            }),
        }
    }

    /// Unwrap the payload, mapping `success: false` to an application error.
    ///
    /// `fallback` is the message used when the server omits one.
    pub fn into_data(self, fallback: &str) -> Result<T, ApiError> {
        if !self.success {
            return Err(self.into_error(fallback));
        }
        self.data
            .ok_or_else(|| ApiError::application("Malformed response: missing data"))
    }

    /// Check success for operations whose payload does not matter.
    pub fn ack(self, fallback: &str) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(self.into_error(fallback))
        }
    }

    fn into_error(self, fallback: &str) -> ApiError {
        match self.error {
            Some(info) => ApiError::Application {
                message: info.message,
                code: info.code,
            },
            None => ApiError::application(fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_data_success() {
        let envelope: Envelope<i64> = serde_json::from_str(r#"{"success":true,"data":7}"#).unwrap();
        assert_eq!(envelope.into_data("fallback").unwrap(), 7);
    }

    #[test]
    fn test_into_data_failure_uses_server_message() {
        let envelope: Envelope<i64> =
            serde_json::from_str(r#"{"success":false,"error":{"message":"nope","code":"conflict"}}"#)
                .unwrap();
        match envelope.into_data("fallback") {
            Err(ApiError::Application { message, code }) => {
                assert_eq!(message, "nope");
                assert_eq!(code.as_deref(), Some("conflict"));
            }
            other => panic!("Expected application error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_data_failure_falls_back() {
        let envelope: Envelope<i64> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        match envelope.into_data("Failed to fetch services") {
            Err(ApiError::Application { message, .. }) => {
                assert_eq!(message, "Failed to fetch services");
            }
            other => panic!("Expected application error, got {:?}", other),
        }
    }

    #[test]
    fn test_ack_ignores_missing_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(envelope.ack("fallback").is_ok());
    }
}
