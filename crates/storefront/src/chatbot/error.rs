//! Error types for the `OpenAI` chat client.

use thiserror::Error;

/// Errors that can occur when calling the chat completions API.
#[derive(Debug, Error)]
pub enum ChatbotError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error body.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The completion carried no text.
    #[error("empty completion")]
    EmptyCompletion,

    /// The API key cannot be sent as a header.
    #[error("invalid API key")]
    InvalidApiKey,
}

/// Error body returned by the chat completions API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chatbot_error_display() {
        let err = ChatbotError::RateLimited(20);
        assert_eq!(err.to_string(), "rate limited, retry after 20 seconds");

        let err = ChatbotError::Api {
            error_type: "insufficient_quota".to_string(),
            message: "You exceeded your current quota".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (insufficient_quota): You exceeded your current quota"
        );
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            response.error.error_type.as_deref(),
            Some("invalid_request_error")
        );
        assert_eq!(response.error.message, "Incorrect API key provided");
    }
}
