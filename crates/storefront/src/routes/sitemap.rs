//! Sitemap route handler.

use axum::{extract::State, http::header, response::IntoResponse};
use tracing::instrument;

use crate::sitemap;
use crate::state::AppState;

/// `GET /sitemap.xml`
#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let xml = sitemap::build(state.backend(), &state.config().base_url).await;
    (
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        xml,
    )
}
