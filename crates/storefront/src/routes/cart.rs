//! Cart and checkout route handlers.
//!
//! The cart lives in the session, so guests and signed-in users share one
//! code path. Prices are taken from the backend when an item is added.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use souk_core::ProductId;
use souk_core::models::{OrderItem, ShippingDetails};
use souk_core::validation;
use tower_sessions::Session;
use tracing::instrument;

use super::{ApiJson, success};
use crate::backend::endpoints;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{Cart, CartItem, session_keys};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Add-to-cart body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// Quantity update body. Zero removes the line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove-from-cart body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartLine {
    pub product_id: ProductId,
}

/// Checkout body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping: ShippingDetails,
    #[serde(default)]
    pub note: Option<String>,
}

/// Order payload sent to the backend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewOrder<'a> {
    items: Vec<OrderItem>,
    shipping_details: &'a ShippingDetails,
    total_amount: rust_decimal::Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<Value>> {
    let cart = load_cart(&session).await?;
    Ok(success(cart.view()))
}

/// Add a product, priced from the backend.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<AddToCart>,
) -> Result<Json<Value>> {
    validation::quantity(body.quantity)?;

    let product = state.backend().product(body.product_id.as_str()).await?;
    let mut cart = load_cart(&session).await?;
    cart.add(CartItem {
        product_id: product.id.clone(),
        price: product.effective_price(),
        image: product.images.first().cloned(),
        name: product.name,
        quantity: body.quantity,
    });
    save_cart(&session, &cart).await?;

    Ok(success(cart.view()))
}

/// Change a line's quantity.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    ApiJson(body): ApiJson<UpdateCartLine>,
) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await?;
    if !cart.update(&body.product_id, body.quantity) {
        return Err(AppError::NotFound(format!("cart item {}", body.product_id)));
    }
    save_cart(&session, &cart).await?;
    Ok(success(cart.view()))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    ApiJson(body): ApiJson<RemoveCartLine>,
) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await?;
    if !cart.remove(&body.product_id) {
        return Err(AppError::NotFound(format!("cart item {}", body.product_id)));
    }
    save_cart(&session, &cart).await?;
    Ok(success(cart.view()))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(success(cart.view()))
}

/// Place an order for the cart.
///
/// Signed-in users order under their account; guests use the guest-order
/// endpoint. The cart is cleared once the backend accepts the order.
#[instrument(skip(state, session, user, body))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".to_string()));
    }
    body.shipping.validate()?;

    let order = NewOrder {
        items: cart.order_items(),
        shipping_details: &body.shipping,
        total_amount: cart.subtotal(),
        note: body.note.as_deref(),
    };

    let created: Value = match &user {
        Some(user) => {
            state
                .backend()
                .post(endpoints::ORDERS, &order, Some(&user.token))
                .await?
        }
        None => state.backend().post(endpoints::ORDERS_GUEST, &order, None).await?,
    };

    tracing::info!(
        guest = user.is_none(),
        items = cart.items.len(),
        total = %order.total_amount,
        "Order placed"
    );

    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(success(created))
}
