//! Backend connectivity check.

use super::{CommandError, backend_client};

/// Ping the backend health endpoint.
///
/// # Errors
///
/// Returns the backend error when it is unreachable or unhealthy.
pub async fn health(backend_url: &str) -> Result<(), CommandError> {
    let backend = backend_client(backend_url)?;
    backend.ping().await?;
    tracing::info!(backend = %backend_url, "Backend is healthy");
    Ok(())
}
