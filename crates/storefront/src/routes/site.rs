//! Site-wide handlers: location prompt flag, seller onboarding, enquiries.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use souk_core::Email;
use souk_core::models::SellerApplication;
use souk_core::validation::{self, ValidationError};
use tower_sessions::Session;
use tracing::instrument;

use super::{ApiJson, success};
use crate::backend::endpoints;
use crate::error::Result;
use crate::models::session_keys;
use crate::state::AppState;

/// Location prompt flag body.
#[derive(Debug, Deserialize)]
pub struct LocationPrompted {
    #[serde(default = "yes")]
    pub prompted: bool,
}

const fn yes() -> bool {
    true
}

/// Contact form.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl Enquiry {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        validation::require("name", &self.name)?;
        validation::require("message", &self.message)?;
        match self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(phone) => validation::phone(phone),
            None => Ok(()),
        }
    }
}

/// Whether the visitor was already asked for their location.
#[instrument(skip(session))]
pub async fn location_prompted(session: Session) -> Result<Json<Value>> {
    let prompted = session
        .get::<bool>(session_keys::LOCATION_PROMPTED)
        .await?
        .unwrap_or(false);
    Ok(success(json!({ "prompted": prompted })))
}

/// Record that the visitor was asked for their location.
#[instrument(skip(session))]
pub async fn set_location_prompted(
    session: Session,
    ApiJson(body): ApiJson<LocationPrompted>,
) -> Result<Json<Value>> {
    session
        .insert(session_keys::LOCATION_PROMPTED, body.prompted)
        .await?;
    Ok(success(json!({ "prompted": body.prompted })))
}

/// Submit a seller application.
#[instrument(skip_all, fields(store = %application.store_name))]
pub async fn register_seller(
    State(state): State<AppState>,
    ApiJson(application): ApiJson<SellerApplication>,
) -> Result<Json<Value>> {
    application.validate()?;

    let created: Value = state
        .backend()
        .post(endpoints::SELLER_REGISTER, &application, None)
        .await?;

    tracing::info!(email = %application.email, "Seller application submitted");
    Ok(Json(json!({
        "success": true,
        "message": "Application submitted. We will review your store shortly.",
        "data": created,
    })))
}

/// Forward a contact enquiry.
#[instrument(skip_all)]
pub async fn enquiry(
    State(state): State<AppState>,
    ApiJson(enquiry): ApiJson<Enquiry>,
) -> Result<Json<Value>> {
    enquiry.validate()?;

    let _: Value = state
        .backend()
        .post(endpoints::ENQUIRIES, &enquiry, None)
        .await?;

    Ok(super::success_message("Thanks for reaching out. We will get back to you soon."))
}
