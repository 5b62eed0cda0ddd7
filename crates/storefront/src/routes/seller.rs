//! Seller dashboard handlers under `/user/seller`.
//!
//! Every call is made with the seller's backend token; the backend scopes
//! `me` endpoints to the store behind it.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use souk_core::models::{
    BoostRequest, Invoice, NewBoostRequest, Order, PaymentInitialization, Product, Settlement,
    SubscriptionPlan,
};
use souk_core::{CurrencyCode, Money, PlanId};
use tracing::instrument;

use super::{ApiJson, PageParams, success};
use crate::backend::{endpoints, into_list};
use crate::error::{AppError, Result};
use crate::middleware::RequireSeller;
use crate::state::AppState;

/// Subscription checkout body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    #[serde(alias = "plan")]
    pub plan_id: PlanId,
}

/// Gateway amounts are in kobo.
fn minor_units(amount: Decimal) -> Result<i64> {
    Money::new(amount, CurrencyCode::NGN)
        .and_then(|money| money.to_minor_units())
        .map_err(|e| AppError::Internal(format!("Plan price {amount} unusable: {e}")))
}

/// GET a list endpoint with the seller's token and read it as `T`.
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

/// The seller's own products.
#[instrument(skip(state, seller), fields(user_id = %seller.id))]
pub async fn products(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let products: Vec<Product> =
        list(&state, endpoints::SELLER_PRODUCTS, &params, &seller.token).await?;
    Ok(success(products))
}

/// Orders containing the seller's products.
#[instrument(skip(state, seller), fields(user_id = %seller.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let orders: Vec<Order> = list(&state, endpoints::SELLER_ORDERS, &params, &seller.token).await?;
    Ok(success(orders))
}

/// Subscription and boost invoices.
#[instrument(skip(state, seller), fields(user_id = %seller.id))]
pub async fn invoices(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let invoices: Vec<Invoice> =
        list(&state, endpoints::SELLER_INVOICES, &params, &seller.token).await?;
    Ok(success(invoices))
}

/// Payouts to the seller.
#[instrument(skip(state, seller), fields(user_id = %seller.id))]
pub async fn settlements(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let settlements: Vec<Settlement> =
        list(&state, endpoints::SELLER_SETTLEMENTS, &params, &seller.token).await?;
    Ok(success(settlements))
}

/// The seller's boost requests.
#[instrument(skip(state, seller), fields(user_id = %seller.id))]
pub async fn boost_requests(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>> {
    let requests: Vec<BoostRequest> =
        list(&state, endpoints::BOOST_REQUESTS_MINE, &params, &seller.token).await?;
    Ok(success(requests))
}

/// Ask for products to be featured.
#[instrument(skip_all, fields(user_id = %seller.id, products = request.products.len()))]
pub async fn create_boost_request(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    ApiJson(request): ApiJson<NewBoostRequest>,
) -> Result<Json<Value>> {
    request.validate()?;

    let created: BoostRequest = state
        .backend()
        .post(endpoints::BOOST_REQUESTS, &request, Some(&seller.token))
        .await?;

    tracing::info!(boost_id = %created.id, "Boost request submitted");
    Ok(success(created))
}

/// Available subscription plans.
#[instrument(skip(state, seller), fields(user_id = %seller.id))]
pub async fn plans(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
) -> Result<Json<Value>> {
    let plans: Vec<SubscriptionPlan> = list(
        &state,
        endpoints::SUBSCRIPTION_PLANS,
        &PageParams::default(),
        &seller.token,
    )
    .await?;
    Ok(success(plans))
}

/// Start a Paystack checkout for a plan.
///
/// The amount comes from the backend's plan list, never from the request.
#[instrument(skip_all, fields(user_id = %seller.id, plan = %body.plan_id))]
pub async fn initialize_subscription(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    ApiJson(body): ApiJson<SubscriptionRequest>,
) -> Result<Json<Value>> {
    let plans: Vec<SubscriptionPlan> = list(
        &state,
        endpoints::SUBSCRIPTION_PLANS,
        &PageParams::default(),
        &seller.token,
    )
    .await?;
    let plan = plans
        .into_iter()
        .find(|plan| plan.id == body.plan_id)
        .ok_or_else(|| AppError::NotFound(format!("Plan {}", body.plan_id)))?;
    let amount = minor_units(plan.price)?;

    let payment = PaymentInitialization {
        email: seller.email.clone(),
        amount,
        plan: Some(plan.id.clone()),
        callback_url: Some(format!(
            "{}/user/seller/subscription",
            state.config().base_url
        )),
        metadata: Some(json!({ "userId": seller.id, "purpose": "subscription" })),
    };

    let checkout: Value = state
        .backend()
        .post(endpoints::PAYSTACK_INITIALIZE, &payment, Some(&seller.token))
        .await?;
    Ok(success(checkout))
}

/// Confirm a Paystack payment after the gateway redirects back.
#[instrument(skip(state, seller), fields(user_id = %seller.id))]
pub async fn verify_subscription(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Path(reference): Path<String>,
) -> Result<Json<Value>> {
    let verification: Value = state
        .backend()
        .get(&endpoints::paystack_verify(&reference), &[], Some(&seller.token))
        .await?;
    Ok(success(verification))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_minor_units() {
        assert_eq!(minor_units(Decimal::from(15_000)).unwrap(), 1_500_000);
        assert_eq!(minor_units(Decimal::from_str("99.995").unwrap()).unwrap(), 10_000);
        assert_eq!(minor_units(Decimal::from_str("0.01").unwrap()).unwrap(), 1);
        assert!(matches!(minor_units(Decimal::MAX), Err(AppError::Internal(_))));
        assert!(matches!(minor_units(Decimal::NEGATIVE_ONE), Err(AppError::Internal(_))));
    }

    #[test]
    fn test_subscription_request_accepts_plan_alias() {
        let body: SubscriptionRequest = serde_json::from_str(r#"{"plan":"gold"}"#).unwrap();
        assert_eq!(body.plan_id, PlanId::new("gold"));
    }
}
