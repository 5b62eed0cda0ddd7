//! Session-related types.
//!
//! Types stored in the session for authentication state.

use std::fmt;

use serde::{Deserialize, Serialize};

use souk_core::{Email, UserId, UserRole};

/// Session-stored user identity.
///
/// Built from the backend's login payload. The backend token is kept so
/// dashboard calls can be made on the user's behalf; it never leaves the
/// server.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role used for route gating.
    pub role: UserRole,
    /// Backend bearer token.
    pub token: String,
}

impl fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Public view of the session user, as returned by `/auth/session`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView<'a> {
    pub id: &'a UserId,
    pub email: &'a Email,
    pub name: &'a str,
    pub role: UserRole,
}

impl CurrentUser {
    /// The user without the backend token.
    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            id: &self.id,
            email: &self.email,
            name: &self.name,
            role: self.role,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the guest/session cart.
    pub const CART: &str = "cart";

    /// Key for the "location prompted" flag.
    pub const LOCATION_PROMPTED: &str = "location_prompted";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            id: UserId::new("u1"),
            email: Email::parse("ada@souk.test").unwrap(),
            name: "Ada".to_string(),
            role: UserRole::Seller,
            token: "eyJhbGciOi.secret".to_string(),
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", user());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_view_omits_token() {
        let json = serde_json::to_value(user().view()).unwrap();
        assert_eq!(json["role"], "seller");
        assert!(json.get("token").is_none());
    }
}
