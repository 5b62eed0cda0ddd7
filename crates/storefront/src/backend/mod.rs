//! Client for the marketplace REST backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products, orders, payments and
//!   accounts. There is no local persistence; every call goes over HTTP.
//! - Public catalogue reads are cached in memory via `moka` (5 minute TTL).
//! - Authenticated calls forward the user's backend token as a bearer token.
//! - No retries: a failed call is reported to the caller as a `BackendError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use souk_storefront::backend::{BackendClient, ProductQuery};
//!
//! let backend = BackendClient::new(&config.backend)?;
//! let page = backend.products(&ProductQuery::default()).await?;
//! let orders: serde_json::Value = backend.get(endpoints::ORDERS_MINE, &[], Some(token)).await?;
//! ```

mod cache;
mod client;
pub mod endpoints;

pub use client::{BackendClient, QueryPairs};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use souk_core::models::Page;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Token missing, expired or not allowed (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Could not build the request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Whether the backend rejected the request itself (4xx), as opposed to
    /// failing or being unreachable.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 400 && *status < 500)
    }
}

/// Catalogue listing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub take: u32,
    /// Free-text search.
    pub search: Option<String>,
    /// Category id or slug.
    pub category: Option<String>,
}

impl ProductQuery {
    /// Largest page size the storefront will request.
    pub const MAX_TAKE: u32 = 100;

    /// Query for page `page` with `take` items.
    #[must_use]
    pub const fn page(page: u32, take: u32) -> Self {
        Self {
            page,
            take,
            search: None,
            category: None,
        }
    }

    /// Clamp paging values into the accepted range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.take = self.take.clamp(1, Self::MAX_TAKE);
        self.search = self.search.filter(|s| !s.trim().is_empty());
        self.category = self.category.filter(|s| !s.trim().is_empty());
        self
    }

    /// Query-string pairs sent to the backend.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("take", self.take.to_string())];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        pairs
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self::page(1, 20)
    }
}

/// Unwrap the `{ "success": .., "message": .., "data": .. }` envelope some
/// endpoints use. Bodies without the envelope pass through unchanged.
pub(crate) fn unwrap_envelope(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map)
            if map.contains_key("data")
                && ["success", "status", "message"]
                    .iter()
                    .any(|k| map.contains_key(*k)) =>
        {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    }
}

/// Read a list that may arrive bare, paged (`{ data: [...] }` and friends),
/// or not at all.
///
/// # Errors
///
/// Returns [`BackendError::Parse`] if the items do not match `T`.
pub fn into_list<T: DeserializeOwned>(value: serde_json::Value) -> Result<Vec<T>, BackendError> {
    Ok(match value {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        other => serde_json::from_value::<Page<T>>(other)?.data,
    })
}

/// Pull a human-readable message out of an error body.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        ["message", "error", "msg"]
            .iter()
            .find_map(|k| v.get(*k).and_then(serde_json::Value::as_str))
            .map(str::to_string)
    });

    from_json.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "(empty response)".to_string()
        } else {
            trimmed.chars().take(200).collect()
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unwrap_envelope() {
        let wrapped = json!({"success": true, "message": "ok", "data": {"id": 1}});
        assert_eq!(unwrap_envelope(wrapped), json!({"id": 1}));

        // "data" alone is a payload field, not an envelope
        let bare = json!({"data": [1, 2]});
        assert_eq!(unwrap_envelope(bare.clone()), bare);

        let list = json!([1, 2, 3]);
        assert_eq!(unwrap_envelope(list.clone()), list);
    }

    #[test]
    fn test_into_list_shapes() {
        let bare: Vec<u32> = into_list(json!([1, 2])).unwrap();
        assert_eq!(bare, vec![1, 2]);
        let paged: Vec<u32> = into_list(json!({"docs": [3], "totalDocs": 1})).unwrap();
        assert_eq!(paged, vec![3]);
        let none: Vec<u32> = into_list(serde_json::Value::Null).unwrap();
        assert!(none.is_empty());
        assert!(into_list::<u32>(json!({"unexpected": true})).is_err());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"message":"Invalid credentials"}"#), "Invalid credentials");
        assert_eq!(error_message(r#"{"error":"Plan not found"}"#), "Plan not found");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message("  "), "(empty response)");
    }

    #[test]
    fn test_product_query_normalized() {
        let query = ProductQuery {
            page: 0,
            take: 500,
            search: Some("  ".to_string()),
            category: Some("fashion".to_string()),
        }
        .normalized();
        assert_eq!(query.page, 1);
        assert_eq!(query.take, ProductQuery::MAX_TAKE);
        assert_eq!(query.search, None);
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "1".to_string()),
                ("take", "100".to_string()),
                ("category", "fashion".to_string())
            ]
        );
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Status {
            status: 422,
            message: "Email already taken".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 422: Email already taken");
        assert!(err.is_client_error());
        assert!(!BackendError::RateLimited(5).is_client_error());
    }
}
