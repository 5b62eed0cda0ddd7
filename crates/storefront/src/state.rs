//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::chatbot::{Chatbot, ChatbotError, OpenAiClient};
use crate::config::StorefrontConfig;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("backend client: {0}")]
    Backend(#[from] BackendError),
    #[error("chatbot client: {0}")]
    Chatbot(#[from] ChatbotError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    chatbot: Chatbot,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL is invalid or an HTTP client
    /// cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let backend = BackendClient::new(&config.backend)?;
        let chatbot = Chatbot::new(OpenAiClient::from_config(&config.chatbot)?);

        if !chatbot.has_model() {
            tracing::info!("OPENAI_API_KEY not set, chatbot will use scripted replies");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                chatbot,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the chatbot.
    #[must_use]
    pub fn chatbot(&self) -> &Chatbot {
        &self.inner.chatbot
    }
}
