//! Storefront-local models.
//!
//! DTOs mirrored from the backend live in `souk_core::models`. These are the
//! types the storefront keeps in its own session.

mod cart;
mod session;

pub use cart::{Cart, CartItem, CartLine, CartView};
pub use session::{CurrentUser, SessionView, keys as session_keys};
