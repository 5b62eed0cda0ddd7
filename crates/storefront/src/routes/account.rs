//! Signed-in customer handlers under `/user`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;
use souk_core::models::{Order, User};
use tracing::instrument;

use super::{PageParams, success};
use crate::backend::{endpoints, into_list};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// The user's order history.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let value: Value = state
        .backend()
        .get(endpoints::ORDERS_MINE, &params.pairs(), Some(&user.token))
        .await?;
    let orders: Vec<Order> = into_list(value)?;
    Ok(success(orders))
}

/// One of the user's orders.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let order: Order = state
        .backend()
        .get(&endpoints::order(&id), &[], Some(&user.token))
        .await?;
    Ok(success(order))
}

/// The user's profile as the backend has it.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let profile: User = state
        .backend()
        .get(endpoints::AUTH_PROFILE, &[], Some(&user.token))
        .await?;
    Ok(success(profile))
}
