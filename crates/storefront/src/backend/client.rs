//! REST client for the marketplace backend.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use souk_core::models::{Category, Page, Product, Subaccount};
use tracing::{debug, instrument};
use url::Url;

use super::cache::{self, CacheValue};
use super::{BackendError, ProductQuery, endpoints, error_message, into_list, unwrap_envelope};
use crate::config::BackendConfig;

/// Query-string pairs for a backend call.
pub type QueryPairs<'a> = &'a [(&'a str, String)];

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the marketplace REST backend.
///
/// Cheap to clone. Public catalogue reads (products, categories, settings)
/// are cached for 5 minutes; everything else goes straight to the backend.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base: Url,
    subaccounts: Option<Url>,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("souk-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let subaccounts = config
            .paystack_subaccounts_url
            .as_deref()
            .map(Url::parse)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base: base_url(&config.base_url)?,
                subaccounts,
                cache,
            }),
        })
    }

    /// Resolve an endpoint path against the backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if the path cannot be joined.
    pub fn url(&self, path: &str, query: QueryPairs<'_>) -> Result<Url, BackendError> {
        let mut url = self.inner.base.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Send a request and return the response body with any envelope removed.
    async fn send(
        &self,
        method: Method,
        url: Url,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Value, BackendError> {
        let mut request = self
            .inner
            .client
            .request(method.clone(), url.clone())
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Get response body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            let err = status_error(status, retry_after.as_deref(), &text);
            if matches!(err, BackendError::Status { .. }) {
                tracing::warn!(
                    %method,
                    path = url.path(),
                    status = %status,
                    body = %text.chars().take(500).collect::<String>(),
                    "Backend returned non-success status"
                );
            }
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(unwrap_envelope(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = url.path(),
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(BackendError::Parse(e))
            }
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: QueryPairs<'_>,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, BackendError> {
        let url = self.url(path, query)?;
        let value = self.send(method, url, token, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    // =========================================================================
    // Generic verbs
    // =========================================================================

    /// `GET` an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match `T`.
    #[instrument(skip(self, token), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: QueryPairs<'_>,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        self.call(Method::GET, path, query, token, None).await
    }

    /// `POST` a JSON body to an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match `T`.
    #[instrument(skip(self, body, token), fields(path = %path))]
    pub async fn post<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.call(Method::POST, path, &[], token, Some(body)).await
    }

    /// `PUT` a JSON body to an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match `T`.
    #[instrument(skip(self, body, token), fields(path = %path))]
    pub async fn put<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.call(Method::PUT, path, &[], token, Some(body)).await
    }

    /// `PATCH` a JSON body to an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match `T`.
    #[instrument(skip(self, body, token), fields(path = %path))]
    pub async fn patch<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.call(Method::PATCH, path, &[], token, Some(body)).await
    }

    /// `DELETE` an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(path = %path))]
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Value, BackendError> {
        self.call(Method::DELETE, path, &[], token, None).await
    }

    // =========================================================================
    // Catalogue (cached)
    // =========================================================================

    /// List products. Pages without a search term are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Page<Product>, BackendError> {
        let cacheable = query.search.is_none();
        let cache_key = cache::products_key(query.page, query.take, query.category.as_deref());

        // Check cache (only for default queries without search)
        if cacheable
            && let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let value: Value = self.get(endpoints::PRODUCTS, &query.to_pairs(), None).await?;
        let page = match value {
            Value::Array(_) => Page::from_items(serde_json::from_value(value)?),
            Value::Null => Page::from_items(Vec::new()),
            other => serde_json::from_value(other)?,
        };

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Get a product by slug or id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product(&self, slug: &str) -> Result<Product, BackendError> {
        let cache_key = cache::product_key(slug);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let value: Value = self.get(&endpoints::product(slug), &[], None).await?;
        let product = product_from_body(value, slug)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(cache::CATEGORIES_KEY).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let value: Value = self.get(endpoints::CATEGORIES, &[], None).await?;
        let categories: Vec<Category> = into_list(value)?;

        self.inner
            .cache
            .insert(
                cache::CATEGORIES_KEY.to_string(),
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Public site settings (contact details, banners).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<Value, BackendError> {
        if let Some(CacheValue::Settings(settings)) =
            self.inner.cache.get(cache::SETTINGS_KEY).await
        {
            debug!("Cache hit for settings");
            return Ok(settings);
        }

        let settings: Value = self.get(endpoints::SETTINGS, &[], None).await?;
        self.inner
            .cache
            .insert(
                cache::SETTINGS_KEY.to_string(),
                CacheValue::Settings(settings.clone()),
            )
            .await;

        Ok(settings)
    }

    /// Drop every cached catalogue response.
    pub fn invalidate_catalogue(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Check the backend answers its health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let _: Value = self.get(endpoints::HEALTH, &[], None).await?;
        Ok(())
    }

    // =========================================================================
    // Paystack subaccounts
    // =========================================================================

    /// Subaccounts live behind their own service when one is configured.
    fn subaccounts_url(&self) -> Result<Url, BackendError> {
        match &self.inner.subaccounts {
            Some(url) => Ok(url.clone()),
            None => self.url(endpoints::SUBACCOUNTS, &[]),
        }
    }

    /// List Paystack subaccounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn subaccounts(&self, token: &str) -> Result<Vec<Subaccount>, BackendError> {
        let url = self.subaccounts_url()?;
        let value = self.send(Method::GET, url, Some(token), None).await?;
        into_list(value)
    }

    /// Create a Paystack subaccount for a seller.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, subaccount, token), fields(business = %subaccount.business_name))]
    pub async fn create_subaccount(
        &self,
        subaccount: &Subaccount,
        token: &str,
    ) -> Result<Subaccount, BackendError> {
        let url = self.subaccounts_url()?;
        let body = serde_json::to_value(subaccount)?;
        let value = self.send(Method::POST, url, Some(token), Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Parse the configured base URL, making sure relative joins keep its path.
/// Map a non-success status and its body to a [`BackendError`].
fn status_error(status: StatusCode, retry_after: Option<&str>, body: &str) -> BackendError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited(
            retry_after
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1),
        ),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            BackendError::Unauthorized(error_message(body))
        }
        StatusCode::NOT_FOUND => BackendError::NotFound(error_message(body)),
        _ => BackendError::Status {
            status: status.as_u16(),
            message: error_message(body),
        },
    }
}

/// Decode a single-product body.
///
/// Some deployments nest the document as `{ "product": {...} }`.
fn product_from_body(value: Value, slug: &str) -> Result<Product, BackendError> {
    let value = match value {
        Value::Object(mut map) if map.contains_key("product") => {
            map.remove("product").unwrap_or(Value::Null)
        }
        other => other,
    };
    if value.is_null() {
        return Err(BackendError::NotFound(format!("Product not found: {slug}")));
    }
    Ok(serde_json::from_value(value)?)
}

fn base_url(raw: &str) -> Result<Url, BackendError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
