//! HTTP route handlers for the storefront.
//!
//! Every handler answers JSON: `{ "success": true, "data": .. }` on success,
//! `{ "success": false, "message": .. }` on failure (see [`crate::error`]).
//!
//! # Route Structure
//!
//! ```text
//! # Catalogue
//! GET  /api/products                 - Paged catalogue (page, take, search, category)
//! GET  /api/products/{slug}          - Product detail
//! POST /api/products/allocate        - Allocate products into homepage sections
//! GET  /api/products/sections        - Sections allocated from the live catalogue
//! GET  /api/categories               - Categories
//! GET  /api/settings                 - Storefront settings
//! GET  /sitemap.xml                  - Sitemap
//!
//! # Assistant
//! POST /api/chatbot                  - Chatbot (OpenAI or scripted)
//!
//! # Cart & checkout
//! GET  /api/cart, DELETE /api/cart   - Show / clear the session cart
//! POST /api/cart/add|update|remove   - Cart mutations
//! POST /api/checkout                 - Place a guest or user order
//!
//! # Site
//! GET/POST /api/location-prompted    - "Location prompted" flag
//! POST /api/sellers/register         - Seller onboarding
//! POST /api/enquiries                - Contact enquiry
//!
//! # Auth
//! POST /auth/login | /auth/signup | /auth/google | /auth/logout
//! GET  /auth/session
//!
//! # Account (signed in)
//! GET  /user/orders, /user/orders/{id}, /user/profile
//!
//! # Seller dashboard (seller or admin)
//! GET  /user/seller/products | orders | invoices | settlements
//! GET  /user/seller/subscription/plans
//! GET/POST /user/seller/boost-requests
//! POST /user/seller/subscription/initialize
//! GET  /user/seller/subscription/verify/{reference}
//!
//! # Back-office (admin)
//! GET  /user/admin/users | sellers | settlements | boost-requests | subaccounts
//! POST /user/admin/sellers/{id}/approve|reject
//! POST /user/admin/boost-requests/{id}/approve|reject
//! POST /user/admin/subaccounts, /user/admin/payments/refund
//! GET/POST /user/admin/categories, PUT/DELETE /user/admin/categories/{id}
//! GET/POST /user/admin/news, PUT/DELETE /user/admin/news/{id}
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod chatbot;
pub mod products;
pub mod seller;
pub mod site;
pub mod sitemap;

use axum::{
    Json, Router,
    extract::{FromRequest, Request},
    middleware::from_fn,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::{
    access_control_middleware, api_rate_limiter, auth_rate_limiter, chatbot_rate_limiter,
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// JSON body extractor whose rejection is an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `{ "success": true, "data": data }`
pub fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// `{ "success": true, "message": message }`
pub fn success_message(message: &str) -> Json<Value> {
    Json(json!({ "success": true, "message": message }))
}

/// `?page=&limit=` on dashboard lists, forwarded to the backend as given.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.max(1).to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.clamp(1, 100).to_string()));
        }
        pairs
    }
}

// =============================================================================
// Route groups
// =============================================================================

/// Public JSON API under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/allocate", post(products::allocate))
        .route("/products/sections", get(products::sections))
        .route("/products/{slug}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/settings", get(products::settings))
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
        .route(
            "/location-prompted",
            get(site::location_prompted).post(site::set_location_prompted),
        )
        .route("/sellers/register", post(site::register_seller))
        .route("/enquiries", post(site::enquiry))
}

/// The assistant, rate limited on its own.
pub fn chatbot_routes() -> Router<AppState> {
    Router::new().route("/chatbot", post(chatbot::chat))
}

/// Sign-in endpoints (rate limited) plus session endpoints (not).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/google", post(auth::google))
        .layer(auth_rate_limiter())
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Signed-in account pages under `/user`.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
        .route("/profile", get(account::profile))
}

/// Seller dashboard under `/user/seller`.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(seller::products))
        .route("/orders", get(seller::orders))
        .route("/invoices", get(seller::invoices))
        .route("/settlements", get(seller::settlements))
        .route(
            "/boost-requests",
            get(seller::boost_requests).post(seller::create_boost_request),
        )
        .route("/subscription/plans", get(seller::plans))
        .route("/subscription/initialize", post(seller::initialize_subscription))
        .route(
            "/subscription/verify/{reference}",
            get(seller::verify_subscription),
        )
}

/// Back-office under `/user/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::users))
        .route("/sellers", get(admin::sellers))
        .route("/sellers/{id}/approve", post(admin::approve_seller))
        .route("/sellers/{id}/reject", post(admin::reject_seller))
        .route("/settlements", get(admin::settlements))
        .route("/boost-requests", get(admin::boost_requests))
        .route("/boost-requests/{id}/approve", post(admin::approve_boost_request))
        .route("/boost-requests/{id}/reject", post(admin::reject_boost_request))
        .route(
            "/subaccounts",
            get(admin::subaccounts).post(admin::create_subaccount),
        )
        .route("/payments/refund", post(admin::refund))
        .route(
            "/categories",
            get(admin::categories).post(admin::create_category),
        )
        .route(
            "/categories/{id}",
            put(admin::update_category).delete(admin::delete_category),
        )
        .route("/news", get(admin::news).post(admin::create_news))
        .route(
            "/news/{id}",
            put(admin::update_news).delete(admin::delete_news),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let api = api_routes()
        .layer(api_rate_limiter())
        .merge(chatbot_routes().layer(chatbot_rate_limiter()));

    let user = account_routes()
        .nest("/seller", seller_routes())
        .nest("/admin", admin_routes())
        .layer(api_rate_limiter());

    Router::new()
        .route("/sitemap.xml", get(sitemap::sitemap))
        .nest("/api", api)
        .nest("/auth", auth_routes())
        .nest("/user", user)
}

/// The full application: routes, session, gating and the middleware stack.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes()
        .layer(from_fn(access_control_middleware))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_app() -> Router {
        app(AppState::new(StorefrontConfig::for_tests()).unwrap())
    }

    async fn send(app: Router, request: axum::http::Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    fn json_request(method: Method, uri: &str, body: &Value) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str, accept_json: bool) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri(uri);
        if accept_json {
            builder = builder.header(header::ACCEPT, "application/json");
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_allocate_endpoint() {
        let products: Vec<Value> = (0..10)
            .map(|i| {
                json!({
                    "_id": format!("p{i}"),
                    "name": format!("Product {i}"),
                    "price": 1000 * (i + 1),
                    "rating": i % 5,
                    "discount": i == 3,
                })
            })
            .collect();

        let (status, _, body) = send(
            test_app(),
            json_request(Method::POST, "/api/products/allocate", &json!({ "products": products })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["stats"]["total"], 10);
        let placed: usize = ["platinum", "gold", "silver", "discounted", "unallocated"]
            .iter()
            .map(|k| body["data"][k].as_array().unwrap().len())
            .sum();
        assert_eq!(placed, 10);
        assert_eq!(body["data"]["discounted"][0]["id"], "p3");
    }

    #[tokio::test]
    async fn test_allocate_accepts_bare_array_and_rejects_garbage() {
        let (status, _, body) = send(
            test_app(),
            json_request(Method::POST, "/api/products/allocate", &json!([])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["total"], 0);

        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/products/allocate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_allocate_rejects_oversized_config() {
        let body = json!({
            "products": [
                {"_id": "p1", "name": "Aso oke", "price": 5000},
                {"_id": "p2", "name": "Adire", "price": 7000},
                {"_id": "p3", "name": "Kente", "price": 9000}
            ],
            "config": { "platinumPercent": 4_294_967_295_u64 }
        });
        let (status, _, body) = send(
            test_app(),
            json_request(Method::POST, "/api/products/allocate", &body),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "platinumPercent must be at most 100");

        let body = json!({
            "products": [],
            "config": { "discountPoints": 1_000 }
        });
        let (status, _, _) = send(
            test_app(),
            json_request(Method::POST, "/api/products/allocate", &body),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_chatbot_falls_back_without_key() {
        let (status, _, body) = send(
            test_app(),
            json_request(Method::POST, "/api/chatbot", &json!({ "message": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "fallback");
        assert!(body["reply"].as_str().unwrap().starts_with("Hello!"));
    }

    #[tokio::test]
    async fn test_chatbot_rejects_empty_conversation() {
        let (status, _, body) = send(
            test_app(),
            json_request(Method::POST, "/api/chatbot", &json!({ "messages": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_user_area_redirects_guests_to_login() {
        let response = test_app()
            .oneshot(get_request("/user/orders?page=2", false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/auth/login?callbackUrl=%2Fuser%2Forders%3Fpage%3D2"
        );
    }

    #[tokio::test]
    async fn test_user_area_json_clients_get_401() {
        let (status, _, body) = send(test_app(), get_request("/user/admin/users", true)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(body["redirect"].as_str().unwrap().starts_with("/auth/login?callbackUrl="));
    }

    #[tokio::test]
    async fn test_session_is_empty_for_guests() {
        let (status, _, body) = send(test_app(), get_request("/auth/session", true)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_signup_validation_runs_before_backend() {
        let (status, _, body) = send(
            test_app(),
            json_request(
                Method::POST,
                "/auth/signup",
                &json!({
                    "name": "Ada",
                    "email": "ada@souk.test",
                    "phone": "08031234567",
                    "password": "short"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "password must be at least 8 characters");
    }

    #[tokio::test]
    async fn test_empty_cart_and_checkout() {
        let (status, _, body) = send(test_app(), get_request("/api/cart", true)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["itemCount"], 0);

        let (status, _, body) = send(
            test_app(),
            json_request(
                Method::POST,
                "/api/checkout",
                &json!({
                    "shipping": {
                        "fullName": "Ada Obi",
                        "email": "ada@souk.test",
                        "phone": "08031234567",
                        "address": "12 Marina"
                    }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Your cart is empty");
    }

    #[tokio::test]
    async fn test_cart_update_of_missing_line_is_404() {
        let (status, _, body) = send(
            test_app(),
            json_request(
                Method::POST,
                "/api/cart/update",
                &json!({ "productId": "p1", "quantity": 3 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_session_persists_across_requests() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/location-prompted",
                &json!({ "prompted": true }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let request = axum::http::Request::builder()
            .uri("/api/location-prompted")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let (_, _, body) = send(app, request).await;
        assert_eq!(body["data"]["prompted"], true);
    }

    #[tokio::test]
    async fn test_location_prompted_defaults_false() {
        let (status, _, body) = send(test_app(), get_request("/api/location-prompted", true)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["prompted"], false);
    }

    #[tokio::test]
    async fn test_security_headers_and_request_id() {
        let request = axum::http::Request::builder()
            .uri("/auth/session")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = send(test_app(), request).await;
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_bad_gateway() {
        let (status, _, body) = send(test_app(), get_request("/api/categories", true)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "External service error");
    }

    #[tokio::test]
    async fn test_sitemap_serves_static_pages_when_backend_is_down() {
        let response = test_app()
            .oneshot(get_request("/sitemap.xml", false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let xml = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(xml.contains("<loc>https://souk.test/products</loc>"));
        assert!(!xml.contains("/product/"));
    }

    #[tokio::test]
    async fn test_delete_route_is_registered() {
        let request = axum::http::Request::builder()
            .method(Method::DELETE)
            .uri("/api/cart")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}
