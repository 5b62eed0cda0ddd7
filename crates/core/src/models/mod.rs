//! DTOs mirrored from the marketplace backend's REST payloads.
//!
//! The backend speaks camelCase JSON and sends ids as either `_id` or `id`.
//! Every DTO accepts both spellings and keeps fields it does not model in a
//! flattened `extra` map, so a payload that passes through the storefront
//! comes back out with nothing dropped.

pub mod billing;
pub mod boost;
pub mod catalog;
pub mod order;
pub mod page;
pub mod product;
pub mod seller;
pub mod user;

mod de;

pub use billing::{Invoice, PaymentInitialization, Settlement, Subaccount, SubscriptionPlan};
pub use boost::{BoostRequest, NewBoostRequest};
pub use catalog::{Category, News};
pub use order::{Order, OrderItem, ShippingDetails};
pub use page::Page;
pub use product::Product;
pub use seller::{SellerApplication, StoreRef, StoreSummary};
pub use user::User;

/// Fields a DTO does not model, kept verbatim.
pub type Extra = serde_json::Map<String, serde_json::Value>;
