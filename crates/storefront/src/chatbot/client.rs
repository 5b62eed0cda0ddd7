//! `OpenAI` chat completions client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use super::error::{ApiErrorResponse, ChatbotError};
use super::types::{ChatMessage, CompletionRequest, CompletionResponse};
use crate::config::ChatbotConfig;

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the chat completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    inner: Arc<OpenAiClientInner>,
}

struct OpenAiClientInner {
    client: reqwest::Client,
    model: String,
    api_url: String,
}

impl OpenAiClient {
    /// Create a client, or `None` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be used as a header value or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &ChatbotConfig) -> Result<Option<Self>, ChatbotError> {
        let Some(api_key) = &config.api_key else {
            return Ok(None);
        };

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|_| ChatbotError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Some(Self {
            inner: Arc::new(OpenAiClientInner {
                client,
                model: config.model.clone(),
                api_url: config.api_url.clone(),
            }),
        }))
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Ask for a completion of `messages` (system prompt included).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error,
    /// or the completion is empty.
    #[instrument(skip(self, messages), fields(model = %self.inner.model, messages = messages.len()))]
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ChatbotError> {
        let request = CompletionRequest {
            model: &self.inner.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.api_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let completion: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ChatbotError::Parse(format!("Failed to parse response: {e}")))?;

        completion.into_text().ok_or(ChatbotError::EmptyCompletion)
    }
}

/// Map an error status to a [`ChatbotError`].
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> ChatbotError {
    // Check for rate limiting
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return ChatbotError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ChatbotError::Unauthorized("Invalid API key".to_string());
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => ChatbotError::Api {
                error_type: api_error
                    .error
                    .error_type
                    .unwrap_or_else(|| status.as_u16().to_string()),
                message: api_error.error.message,
            },
            Err(_) => ChatbotError::Api {
                error_type: status.as_u16().to_string(),
                message: body.chars().take(200).collect(),
            },
        },
        Err(e) => ChatbotError::Http(e),
    }
}
