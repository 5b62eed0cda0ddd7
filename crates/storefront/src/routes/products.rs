//! Catalogue route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use souk_core::allocation::{
    AllocationConfig, ProductAllocation, Sections, allocate_products,
    ensure_no_product_duplicate_across_sections,
};
use souk_core::models::Product;
use tracing::instrument;

use super::{ApiJson, success};
use crate::backend::ProductQuery;
use crate::error::Result;
use crate::state::AppState;

/// Products pulled from the backend for `/api/products/sections`.
const SECTIONS_SAMPLE: u32 = 100;

/// Browsers and CDNs may cache public catalogue reads briefly.
const CATALOGUE_MAX_AGE: &str = "public, max-age=60";

/// Catalogue listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub take: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl From<ListParams> for ProductQuery {
    fn from(params: ListParams) -> Self {
        let defaults = Self::default();
        Self {
            page: params.page.unwrap_or(defaults.page),
            take: params.take.unwrap_or(defaults.take),
            search: params.search,
            category: params.category,
        }
        .normalized()
    }
}

/// Paged product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let query = ProductQuery::from(params);
    let page = state.backend().products(&query).await?;
    Ok(([(header::CACHE_CONTROL, CATALOGUE_MAX_AGE)], success(page)))
}

/// Product detail by slug or id.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state.backend().product(&slug).await?;
    Ok(([(header::CACHE_CONTROL, CATALOGUE_MAX_AGE)], success(product)))
}

/// All categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = state.backend().categories().await?;
    Ok(([(header::CACHE_CONTROL, CATALOGUE_MAX_AGE)], success(categories)))
}

/// Storefront settings.
#[instrument(skip(state))]
pub async fn settings(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let settings = state.backend().settings().await?;
    Ok(([(header::CACHE_CONTROL, CATALOGUE_MAX_AGE)], success(settings)))
}

/// Body of an allocation request: `{ "products": [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AllocateRequest {
    Wrapped {
        products: Vec<Product>,
        #[serde(default)]
        config: Option<AllocationConfig>,
    },
    Bare(Vec<Product>),
}

fn allocation_response(allocation: &ProductAllocation) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": allocation,
        "stats": allocation.stats(),
    }))
}

/// Allocate submitted products into the homepage sections.
///
/// A submitted `config` must pass [`AllocationConfig::validate`].
#[instrument(skip_all)]
pub async fn allocate(ApiJson(request): ApiJson<AllocateRequest>) -> Result<Json<Value>> {
    let (products, config) = match request {
        AllocateRequest::Wrapped { products, config } => (products, config.unwrap_or_default()),
        AllocateRequest::Bare(products) => (products, AllocationConfig::default()),
    };
    config.validate()?;

    let allocation = allocate_products(&products, Utc::now(), &config);
    tracing::debug!(stats = ?allocation.stats(), "Products allocated");
    Ok(allocation_response(&allocation))
}

/// Allocate the first page of the live catalogue.
#[instrument(skip(state))]
pub async fn sections(State(state): State<AppState>) -> Result<Json<Value>> {
    let page = state
        .backend()
        .products(&ProductQuery::page(1, SECTIONS_SAMPLE))
        .await?;

    let allocation = allocate_products(&page.data, Utc::now(), &AllocationConfig::default());
    Ok(sections_response(allocation))
}

/// Display sections only, deduplicated across sections.
fn sections_response(allocation: ProductAllocation) -> Json<Value> {
    let stats = allocation.stats();
    let Sections {
        platinum,
        gold,
        silver,
        discounted,
    } = allocation.into_sections();
    let sections = ensure_no_product_duplicate_across_sections(platinum, gold, silver, discounted);

    Json(json!({
        "success": true,
        "data": sections,
        "stats": stats,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_sections_response_drops_leftovers() {
        let products: Vec<Product> = (0..30)
            .map(|i| Product::new(format!("p{}", i % 25), format!("Product {i}")))
            .collect();
        let allocation = allocate_products(&products, Utc::now(), &AllocationConfig::default());
        let Json(body) = sections_response(allocation);

        assert_eq!(body["success"], true);
        let data = body["data"].as_object().unwrap();
        assert!(data.get("unallocated").is_none());

        let mut seen = HashSet::new();
        for section in ["platinum", "gold", "silver", "discounted"] {
            for product in data[section].as_array().unwrap() {
                let id = product["id"].as_str().unwrap().to_string();
                assert!(seen.insert(id), "product repeated across sections");
            }
        }
        assert!(!seen.is_empty());
        assert!(seen.len() <= 25);
    }

    #[test]
    fn test_list_params_defaults_and_clamps() {
        let query = ProductQuery::from(ListParams::default());
        assert_eq!(query, ProductQuery::default());

        let query = ProductQuery::from(ListParams {
            page: Some(0),
            take: Some(1000),
            search: Some("bag".to_string()),
            category: None,
        });
        assert_eq!(query.page, 1);
        assert_eq!(query.take, ProductQuery::MAX_TAKE);
        assert_eq!(query.search.as_deref(), Some("bag"));
    }
}
