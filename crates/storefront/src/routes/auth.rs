//! Authentication route handlers.
//!
//! Credentials are checked by the backend. On success the backend's token
//! and user are kept in the session; the token never reaches the browser.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use souk_core::Email;
use souk_core::models::User;
use souk_core::validation;
use tower_sessions::Session;
use tracing::instrument;

use super::{ApiJson, success, success_message};
use crate::backend::endpoints;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: Email,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub password: String,
}

/// Google sign-in: a Firebase ID token obtained in the browser.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleForm {
    pub id_token: String,
}

/// Where to go after signing in.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackQuery {
    pub callback_url: Option<String>,
}

/// Successful auth payload from the backend.
#[derive(Debug, Deserialize)]
struct AuthPayload {
    #[serde(alias = "accessToken", alias = "access_token", alias = "jwt")]
    token: String,
    user: User,
}

impl From<AuthPayload> for CurrentUser {
    fn from(payload: AuthPayload) -> Self {
        Self {
            id: payload.user.id,
            email: payload.user.email,
            name: payload.user.name,
            role: payload.user.role,
            token: payload.token,
        }
    }
}

/// Only same-site paths are honoured as callbacks.
fn safe_callback(callback: Option<&str>) -> &str {
    match callback {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Store the user in the session and describe where to go next.
async fn sign_in(
    session: &Session,
    payload: AuthPayload,
    callback: Option<&str>,
) -> Result<Json<Value>> {
    let user = CurrentUser::from(payload);
    set_current_user(session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");
    Ok(success(json!({
        "user": user.view(),
        "redirect": safe_callback(callback),
    })))
}

// =============================================================================
// Handlers
// =============================================================================

/// Sign in with email and password.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
    ApiJson(form): ApiJson<LoginForm>,
) -> Result<Json<Value>> {
    validation::require("password", &form.password)?;

    let payload: AuthPayload = state
        .backend()
        .post(endpoints::AUTH_LOGIN, &form, None)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

    sign_in(&session, payload, query.callback_url.as_deref()).await
}

/// Create an account. Signs the user in when the backend returns a token.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
    ApiJson(form): ApiJson<SignupForm>,
) -> Result<Json<Value>> {
    validation::require("name", &form.name)?;
    validation::phone(&form.phone)?;
    validation::password(&form.password)?;

    let created: Value = state
        .backend()
        .post(endpoints::AUTH_REGISTER, &form, None)
        .await?;

    match serde_json::from_value::<AuthPayload>(created) {
        Ok(payload) => sign_in(&session, payload, query.callback_url.as_deref()).await,
        Err(_) => Ok(success_message("Account created. Please sign in.")),
    }
}

/// Sign in with a Google (Firebase) ID token.
#[instrument(skip_all)]
pub async fn google(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
    ApiJson(form): ApiJson<GoogleForm>,
) -> Result<Json<Value>> {
    if form.id_token.trim().is_empty() {
        return Err(AppError::BadRequest("Missing Google ID token".to_string()));
    }

    let payload: AuthPayload = state
        .backend()
        .post(endpoints::AUTH_GOOGLE, &form, None)
        .await?;

    sign_in(&session, payload, query.callback_url.as_deref()).await
}

/// Sign out.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(success_message("Signed out"))
}

/// The signed-in user, or `null`.
pub async fn session(OptionalAuth(user): OptionalAuth) -> Json<Value> {
    success(user.as_ref().map(CurrentUser::view))
}
