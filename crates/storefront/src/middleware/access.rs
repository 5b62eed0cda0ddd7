//! Route gating by session and role.
//!
//! [`decide`] is a pure function of the request path and the session role;
//! [`access_control_middleware`] applies it to every request before routing.
//!
//! | Path                                   | Rule                          |
//! |----------------------------------------|-------------------------------|
//! | `/auth/login`, `/auth/signup`, ...     | guests only, users go home    |
//! | `/user/admin/**`                       | `admin`                       |
//! | `/user/seller/**`                      | `seller` or `admin`           |
//! | `/user/**`                             | any signed-in user            |
//! | everything else                        | open                          |

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header::ACCEPT},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use souk_core::UserRole;
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Login page.
pub const LOGIN_PATH: &str = "/auth/login";

/// Pages only guests should see.
const GUEST_ONLY: &[&str] = &[
    "/auth/login",
    "/auth/signup",
    "/auth/register",
    "/auth/forgot-password",
];

/// Outcome of gating a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Signed-in user on a guest-only page.
    RedirectHome,
    /// Gated page without a session.
    RedirectLogin,
    /// Signed in, but the role may not open this page.
    Forbidden,
}

/// Whether `path` is `prefix` itself or below it.
fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Decide what happens to a request for `path` from a user with `role`.
#[must_use]
pub fn decide(path: &str, role: Option<UserRole>) -> Access {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    if GUEST_ONLY.contains(&path) {
        return if role.is_some() {
            Access::RedirectHome
        } else {
            Access::Allow
        };
    }

    if !under(path, "/user") {
        return Access::Allow;
    }

    let Some(role) = role else {
        return Access::RedirectLogin;
    };

    let allowed = if under(path, "/user/admin") {
        role.is_admin()
    } else if under(path, "/user/seller") {
        role.can_sell()
    } else {
        true
    };

    if allowed { Access::Allow } else { Access::Forbidden }
}

/// Login URL that returns to `path_and_query` after signing in.
#[must_use]
pub fn login_redirect(path_and_query: &str) -> String {
    format!(
        "{LOGIN_PATH}?callbackUrl={}",
        urlencoding::encode(path_and_query)
    )
}

/// Whether the client asked for JSON rather than a page.
fn wants_json(request: &Request) -> bool {
    request
        .headers()
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Apply [`decide`] to every request.
///
/// Browsers are redirected. Clients sending `Accept: application/json` get
/// the matching status code with the redirect target in the body.
pub async fn access_control_middleware(request: Request, next: Next) -> Response {
    let role = match request.extensions().get::<Session>() {
        Some(session) => session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .map(|user| user.role),
        None => None,
    };

    let path = request.uri().path();
    let access = decide(path, role);
    if access == Access::Allow {
        return next.run(request).await;
    }

    let target = match access {
        Access::RedirectLogin => {
            let path_and_query = request
                .uri()
                .path_and_query()
                .map_or(path, |pq| pq.as_str());
            login_redirect(path_and_query)
        }
        _ => "/".to_string(),
    };

    tracing::debug!(path, ?access, ?role, "Request gated");

    if wants_json(&request) {
        let (status, message) = match access {
            Access::RedirectLogin => (StatusCode::UNAUTHORIZED, "Sign in to continue"),
            Access::Forbidden => (StatusCode::FORBIDDEN, "You do not have access to this page"),
            _ => (StatusCode::CONFLICT, "You are already signed in"),
        };
        return (
            status,
            Json(json!({ "success": false, "message": message, "redirect": target })),
        )
            .into_response();
    }

    Redirect::to(&target).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_only_pages() {
        assert_eq!(decide("/auth/login", None), Access::Allow);
        assert_eq!(
            decide("/auth/login", Some(UserRole::User)),
            Access::RedirectHome
        );
        assert_eq!(
            decide("/auth/forgot-password/", Some(UserRole::Admin)),
            Access::RedirectHome
        );
        // logout and session stay reachable when signed in
        assert_eq!(decide("/auth/logout", Some(UserRole::User)), Access::Allow);
        assert_eq!(decide("/auth/session", Some(UserRole::User)), Access::Allow);
    }

    #[test]
    fn test_user_area_needs_session() {
        assert_eq!(decide("/user/orders", None), Access::RedirectLogin);
        assert_eq!(decide("/user", None), Access::RedirectLogin);
        assert_eq!(decide("/user/orders", Some(UserRole::User)), Access::Allow);
    }

    #[test]
    fn test_seller_area() {
        assert_eq!(decide("/user/seller/products", None), Access::RedirectLogin);
        assert_eq!(
            decide("/user/seller/products", Some(UserRole::User)),
            Access::Forbidden
        );
        assert_eq!(
            decide("/user/seller/products", Some(UserRole::Seller)),
            Access::Allow
        );
        assert_eq!(
            decide("/user/seller/products", Some(UserRole::Admin)),
            Access::Allow
        );
    }

    #[test]
    fn test_admin_area() {
        assert_eq!(decide("/user/admin/users", None), Access::RedirectLogin);
        assert_eq!(
            decide("/user/admin/users", Some(UserRole::Seller)),
            Access::Forbidden
        );
        assert_eq!(
            decide("/user/admin/users", Some(UserRole::Admin)),
            Access::Allow
        );
    }

    #[test]
    fn test_prefixes_match_whole_segments() {
        assert_eq!(decide("/users-guide", None), Access::Allow);
        assert_eq!(
            decide("/user/administrator", Some(UserRole::User)),
            Access::Allow
        );
        assert_eq!(decide("/api/products", None), Access::Allow);
        assert_eq!(decide("/", None), Access::Allow);
    }

    #[test]
    fn test_login_redirect_encodes_callback() {
        assert_eq!(
            login_redirect("/user/orders?page=2"),
            "/auth/login?callbackUrl=%2Fuser%2Forders%3Fpage%3D2"
        );
    }
}
