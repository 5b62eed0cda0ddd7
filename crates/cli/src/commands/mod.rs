//! Subcommand implementations.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use souk_core::validation::ValidationError;
use souk_storefront::backend::{BackendClient, BackendError};
use souk_storefront::config::BackendConfig;
use thiserror::Error;

pub mod allocate;
pub mod backend;
pub mod sitemap;

/// Errors a subcommand can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid allocation config: {0}")]
    Config(#[from] ValidationError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl CommandError {
    fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Backend client for one-off commands.
fn backend_client(base_url: &str) -> Result<BackendClient, CommandError> {
    let config = BackendConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(30),
        paystack_subaccounts_url: None,
    };
    Ok(BackendClient::new(&config)?)
}

/// Write command output to `path`, or stdout when absent.
fn emit(path: Option<&Path>, contents: &str) -> Result<(), CommandError> {
    match path {
        Some(path) => std::fs::write(path, contents).map_err(|e| CommandError::io(path, e)),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{contents}").map_err(|e| CommandError::io("stdout", e))
        }
    }
}
