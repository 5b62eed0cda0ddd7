//! Backend REST endpoint paths.
//!
//! Paths are relative to `SOUK_BACKEND_URL` and have no leading slash, so
//! `Url::join` keeps any path prefix the base URL carries (`/api/v1/`).
//! Builders percent-encode caller-supplied segments.

pub const HEALTH: &str = "health";

// Catalogue
pub const PRODUCTS: &str = "products";
pub const CATEGORIES: &str = "categories";
pub const SETTINGS: &str = "settings";
pub const ENQUIRIES: &str = "enquiries";

// Auth
pub const AUTH_LOGIN: &str = "auth/login";
pub const AUTH_REGISTER: &str = "auth/register";
pub const AUTH_GOOGLE: &str = "auth/google";
pub const AUTH_PROFILE: &str = "auth/profile";

// Orders
pub const ORDERS: &str = "orders";
pub const ORDERS_MINE: &str = "orders/my-orders";
pub const ORDERS_GUEST: &str = "orders/guest";

// Sellers
pub const SELLERS: &str = "sellers";
pub const SELLER_REGISTER: &str = "sellers/register";
pub const SELLER_PRODUCTS: &str = "sellers/me/products";
pub const SELLER_ORDERS: &str = "sellers/me/orders";
pub const SELLER_INVOICES: &str = "sellers/me/invoices";
pub const SELLER_SETTLEMENTS: &str = "sellers/me/settlements";

// Boost requests
pub const BOOST_REQUESTS: &str = "boost-requests";
pub const BOOST_REQUESTS_MINE: &str = "boost-requests/mine";

// Subscriptions and payments
pub const SUBSCRIPTION_PLANS: &str = "subscriptions/plans";
pub const PAYSTACK_INITIALIZE: &str = "paystack/initialize";
pub const PAYSTACK_VERIFY: &str = "paystack/verify";
pub const PAYSTACK_REFUND: &str = "paystack/refund";
pub const SUBACCOUNTS: &str = "paystack/subaccounts";

// Back-office
pub const USERS: &str = "users";
pub const SETTLEMENTS: &str = "settlements";
pub const NEWS: &str = "news";

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `products/{slug}`
#[must_use]
pub fn product(slug: &str) -> String {
    format!("{PRODUCTS}/{}", segment(slug))
}

/// `orders/{id}`
#[must_use]
pub fn order(id: &str) -> String {
    format!("{ORDERS}/{}", segment(id))
}

/// `sellers/{id}/status`
#[must_use]
pub fn seller_status(id: &str) -> String {
    format!("{SELLERS}/{}/status", segment(id))
}

/// `boost-requests/{id}/status`
#[must_use]
pub fn boost_request_status(id: &str) -> String {
    format!("{BOOST_REQUESTS}/{}/status", segment(id))
}

/// `paystack/verify/{reference}`
#[must_use]
pub fn paystack_verify(reference: &str) -> String {
    format!("{PAYSTACK_VERIFY}/{}", segment(reference))
}

/// `categories/{id}`
#[must_use]
pub fn category(id: &str) -> String {
    format!("{CATEGORIES}/{}", segment(id))
}

/// `news/{id}`
#[must_use]
pub fn news(id: &str) -> String {
    format!("{NEWS}/{}", segment(id))
}
