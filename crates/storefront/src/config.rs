//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SOUK_BASE_URL` - Public URL of the storefront (sitemap links, cookies)
//! - `SOUK_BACKEND_URL` - Base URL of the marketplace REST backend
//! - `SESSION_SECRET` - Session signing secret (min 32 chars, high entropy).
//!   `NEXTAUTH_SECRET` is accepted as a fallback name.
//!
//! ## Optional
//! - `SOUK_HOST` - Bind address (default: 127.0.0.1)
//! - `SOUK_PORT` - Listen port (default: 3000)
//! - `SOUK_BACKEND_TIMEOUT_SECS` - Backend request timeout (default: 30)
//! - `PAYSTACK_SUBACCOUNTS_API` - Subaccounts service URL
//!   (`NEXT_PUBLIC_PAYSTACK_SUBACCOUNTS_API` is accepted as a fallback name)
//! - `OPENAI_API_KEY` - Enables the AI chatbot; scripted replies without it
//! - `OPENAI_MODEL` - Chat model (default: gpt-4o-mini)
//! - `OPENAI_API_URL` - Chat completions endpoint
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront, without a trailing slash
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Marketplace backend configuration
    pub backend: BackendConfig,
    /// Chatbot configuration
    pub chatbot: ChatbotConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Marketplace backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// REST API base URL
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Separate Paystack subaccounts service, when deployed apart from the API
    pub paystack_subaccounts_url: Option<String>,
}

/// Chatbot configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ChatbotConfig {
    /// `OpenAI` API key; `None` means scripted replies only
    pub api_key: Option<SecretString>,
    /// Chat completion model
    pub model: String,
    /// Chat completions endpoint
    pub api_url: String,
}

impl std::fmt::Debug for ChatbotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatbotConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("SOUK_HOST", "127.0.0.1")?;
        let port = parse_env("SOUK_PORT", "3000")?;
        let base_url = trim_url(&get_required_env("SOUK_BASE_URL")?);

        let (secret_var, session_secret) = get_session_secret()?;
        validate_session_secret(&session_secret, secret_var)?;
        validate_secret_strength(session_secret.expose_secret(), secret_var)?;

        let backend = BackendConfig::from_env()?;
        let chatbot = ChatbotConfig::from_env();

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            backend,
            chatbot,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("SOUK_BACKEND_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SOUK_BACKEND_URL".to_string(), e.to_string())
        })?;
        let timeout_secs: u64 = parse_env("SOUK_BACKEND_TIMEOUT_SECS", "30")?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            paystack_subaccounts_url: get_optional_env("PAYSTACK_SUBACCOUNTS_API")
                .or_else(|| get_optional_env("NEXT_PUBLIC_PAYSTACK_SUBACCOUNTS_API")),
        })
    }
}

impl ChatbotConfig {
    fn from_env() -> Self {
        Self {
            api_key: get_optional_env("OPENAI_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            model: get_env_or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            api_url: get_env_or_default("OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Session secret under its own name or the legacy `NEXTAUTH_SECRET` name.
fn get_session_secret() -> Result<(&'static str, SecretString), ConfigError> {
    for key in ["SESSION_SECRET", "NEXTAUTH_SECRET"] {
        if let Ok(value) = std::env::var(key) {
            return Ok((key, SecretString::from(value)));
        }
    }
    Err(ConfigError::MissingEnvVar("SESSION_SECRET".to_string()))
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
impl StorefrontConfig {
    /// Configuration pointing at a backend that is never reached in tests.
    pub(crate) fn for_tests() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "https://souk.test".to_string(),
            session_secret: SecretString::from("kQ9#vL2$mX7!pR4@wT8&zB1*nC5^hJ3%"),
            backend: BackendConfig {
                base_url: "http://127.0.0.1:9/api/".to_string(),
                timeout: Duration::from_secs(1),
                paystack_subaccounts_url: None,
            },
            chatbot: ChatbotConfig {
                api_key: None,
                model: DEFAULT_OPENAI_MODEL.to_string(),
                api_url: DEFAULT_OPENAI_API_URL.to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_bounds() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("changeme-nextauth-value", "SESSION_SECRET").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(var, _) if var == "SESSION_SECRET"));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"ab".repeat(20), "SESSION_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "SESSION_SECRET").is_ok());
    }

    #[test]
    fn test_validate_session_secret_length() {
        assert!(validate_session_secret(&SecretString::from("short"), "SESSION_SECRET").is_err());
        assert!(
            validate_session_secret(&SecretString::from("a".repeat(32)), "SESSION_SECRET").is_ok()
        );
    }

    #[test]
    fn test_trim_url() {
        assert_eq!(trim_url(" https://souk.ng/ "), "https://souk.ng");
        assert_eq!(trim_url("https://souk.ng"), "https://souk.ng");
    }

    #[test]
    fn test_socket_addr_and_secure() {
        let config = StorefrontConfig::for_tests();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.is_secure());
    }

    #[test]
    fn test_chatbot_config_debug_redacts_key() {
        let config = ChatbotConfig {
            api_key: Some(SecretString::from("sk-live-value-123")),
            model: "gpt-4o-mini".to_string(),
            api_url: DEFAULT_OPENAI_API_URL.to_string(),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("gpt-4o-mini"));
        assert!(!debug_output.contains("sk-live-value-123"));
    }
}
