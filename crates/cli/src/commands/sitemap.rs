//! Render `sitemap.xml` outside the server, e.g. for a static host.

use std::path::Path;

use souk_storefront::sitemap;

use super::{CommandError, backend_client, emit};

/// Build the sitemap from the backend catalogue and write it out.
///
/// Product pages the backend cannot list are left out, same as the live
/// `/sitemap.xml`.
///
/// # Errors
///
/// Returns an error if the backend URL is invalid or the output cannot be
/// written.
pub async fn run(backend_url: &str, base_url: &str, output: Option<&Path>) -> Result<(), CommandError> {
    let backend = backend_client(backend_url)?;
    let base_url = base_url.trim().trim_end_matches('/');
    let xml = sitemap::build(&backend, base_url).await;

    if let Some(path) = output {
        tracing::info!(path = %path.display(), bytes = xml.len(), "Sitemap written");
    }
    emit(output, &xml)
}
