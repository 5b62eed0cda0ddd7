//! Back-office handlers under `/user/admin`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use souk_core::models::{BoostRequest, Category, News, Settlement, Subaccount, User};
use souk_core::{ReviewDecision, validation};
use tracing::instrument;

use super::{ApiJson, PageParams, success, success_message};
use crate::backend::{endpoints, into_list};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Optional note sent with an approval or rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewNote {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Refund request for a Paystack transaction.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    #[serde(alias = "transaction")]
    pub reference: String,
    /// Partial refund amount; the full charge when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RefundRequest {
    fn validate(&self) -> std::result::Result<(), validation::ValidationError> {
        validation::require("reference", &self.reference)?;
        if self.amount.is_some_and(|amount| amount <= Decimal::ZERO) {
            return Err(validation::ValidationError::Invalid(
                "refund amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

async fn list<T: serde::de::DeserializeOwned>(
    state: &AppState,
    path: &str,
    params: &PageParams,
    token: &str,
) -> Result<Vec<T>> {
    let value: Value = state
        .backend()
        .get(path, &params.pairs(), Some(token))
        .await?;
    Ok(into_list(value)?)
}

// =============================================================================
// Users and sellers
// =============================================================================

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let users: Vec<User> = list(&state, endpoints::USERS, &params, &admin.token).await?;
    Ok(success(users))
}

/// Seller accounts with their onboarding status.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn sellers(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let sellers: Value = state
        .backend()
        .get(endpoints::SELLERS, &params.pairs(), Some(&admin.token))
        .await?;
    Ok(success(sellers))
}

async fn review_seller(
    state: &AppState,
    token: &str,
    id: &str,
    decision: ReviewDecision,
    note: ReviewNote,
) -> Result<Json<Value>> {
    let body = json!({ "status": decision.seller_status(), "reason": note.reason });
    let seller: Value = state
        .backend()
        .patch(&endpoints::seller_status(id), &body, Some(token))
        .await?;
    tracing::info!(seller_id = %id, ?decision, "Seller reviewed");
    Ok(success(seller))
}

#[instrument(skip(state, admin, note), fields(admin_id = %admin.id))]
pub async fn approve_seller(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    note: Option<Json<ReviewNote>>,
) -> Result<Json<Value>> {
    let note = note.map(|Json(note)| note).unwrap_or_default();
    review_seller(&state, &admin.token, &id, ReviewDecision::Approve, note).await
}

#[instrument(skip(state, admin, note), fields(admin_id = %admin.id))]
pub async fn reject_seller(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    note: Option<Json<ReviewNote>>,
) -> Result<Json<Value>> {
    let note = note.map(|Json(note)| note).unwrap_or_default();
    review_seller(&state, &admin.token, &id, ReviewDecision::Reject, note).await
}

// =============================================================================
// Money
// =============================================================================

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn settlements(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let settlements: Vec<Settlement> =
        list(&state, endpoints::SETTLEMENTS, &params, &admin.token).await?;
    Ok(success(settlements))
}

/// Paystack subaccounts used to split seller payouts.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn subaccounts(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Value>> {
    let subaccounts = state.backend().subaccounts(&admin.token).await?;
    Ok(success(subaccounts))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create_subaccount(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(subaccount): ApiJson<Subaccount>,
) -> Result<Json<Value>> {
    subaccount.validate()?;
    let created = state
        .backend()
        .create_subaccount(&subaccount, &admin.token)
        .await?;
    tracing::info!(business = %created.business_name, "Subaccount created");
    Ok(success(created))
}

#[instrument(skip_all, fields(admin_id = %admin.id, reference = %request.reference))]
pub async fn refund(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(request): ApiJson<RefundRequest>,
) -> Result<Json<Value>> {
    request.validate()?;
    let refund: Value = state
        .backend()
        .post(endpoints::PAYSTACK_REFUND, &request, Some(&admin.token))
        .await?;
    tracing::info!("Refund issued");
    Ok(success(refund))
}

// =============================================================================
// Boost requests
// =============================================================================

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn boost_requests(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let requests: Vec<BoostRequest> =
        list(&state, endpoints::BOOST_REQUESTS, &params, &admin.token).await?;
    Ok(success(requests))
}

async fn review_boost(
    state: &AppState,
    token: &str,
    id: &str,
    decision: ReviewDecision,
    note: ReviewNote,
) -> Result<Json<Value>> {
    let body = json!({ "status": decision.boost_status(), "reason": note.reason });
    let request: BoostRequest = state
        .backend()
        .patch(&endpoints::boost_request_status(id), &body, Some(token))
        .await?;
    // Boosted products change the featured catalogue
    state.backend().invalidate_catalogue();
    tracing::info!(boost_id = %id, ?decision, "Boost request reviewed");
    Ok(success(request))
}

#[instrument(skip(state, admin, note), fields(admin_id = %admin.id))]
pub async fn approve_boost_request(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    note: Option<Json<ReviewNote>>,
) -> Result<Json<Value>> {
    let note = note.map(|Json(note)| note).unwrap_or_default();
    review_boost(&state, &admin.token, &id, ReviewDecision::Approve, note).await
}

#[instrument(skip(state, admin, note), fields(admin_id = %admin.id))]
pub async fn reject_boost_request(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    note: Option<Json<ReviewNote>>,
) -> Result<Json<Value>> {
    let note = note.map(|Json(note)| note).unwrap_or_default();
    review_boost(&state, &admin.token, &id, ReviewDecision::Reject, note).await
}

// =============================================================================
// Catalogue and CMS
// =============================================================================

/// Categories, uncached.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn categories(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Value>> {
    let categories: Vec<Category> = list(
        &state,
        endpoints::CATEGORIES,
        &PageParams::default(),
        &admin.token,
    )
    .await?;
    Ok(success(categories))
}

#[instrument(skip_all, fields(admin_id = %admin.id, name = %category.name))]
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(category): ApiJson<Category>,
) -> Result<Json<Value>> {
    category.validate()?;
    let created: Category = state
        .backend()
        .post(endpoints::CATEGORIES, &category, Some(&admin.token))
        .await?;
    state.backend().invalidate_catalogue();
    Ok(success(created))
}

#[instrument(skip_all, fields(admin_id = %admin.id, category_id = %id))]
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    ApiJson(category): ApiJson<Category>,
) -> Result<Json<Value>> {
    category.validate()?;
    let updated: Category = state
        .backend()
        .put(&endpoints::category(&id), &category, Some(&admin.token))
        .await?;
    state.backend().invalidate_catalogue();
    Ok(success(updated))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state
        .backend()
        .delete(&endpoints::category(&id), Some(&admin.token))
        .await?;
    state.backend().invalidate_catalogue();
    Ok(success_message("Category deleted"))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn news(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let posts: Vec<News> = list(&state, endpoints::NEWS, &params, &admin.token).await?;
    Ok(success(posts))
}

#[instrument(skip_all, fields(admin_id = %admin.id, title = %post.title))]
pub async fn create_news(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(post): ApiJson<News>,
) -> Result<Json<Value>> {
    post.validate()?;
    let created: News = state
        .backend()
        .post(endpoints::NEWS, &post, Some(&admin.token))
        .await?;
    Ok(success(created))
}

#[instrument(skip_all, fields(admin_id = %admin.id, news_id = %id))]
pub async fn update_news(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    ApiJson(post): ApiJson<News>,
) -> Result<Json<Value>> {
    post.validate()?;
    if !post.id.is_empty() && post.id.as_str() != id {
        return Err(AppError::BadRequest("News id does not match the URL".to_string()));
    }
    let updated: News = state
        .backend()
        .put(&endpoints::news(&id), &post, Some(&admin.token))
        .await?;
    Ok(success(updated))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_news(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state
        .backend()
        .delete(&endpoints::news(&id), Some(&admin.token))
        .await?;
    Ok(success_message("News post deleted"))
}
