// Harness error types
use std::process::ExitStatus;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::runner::RegistryError;

/// Failures while preparing or tearing down a functional test run.
///
/// Test-case failures are not represented here; cases return `anyhow::Result`
/// and the runner reports them directly.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write service config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Failed to launch service '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("WebSentry service exit unexpectedly ({0})")]
    ServiceExited(ExitStatus),

    #[error("Service is not ready, /ping answered {body:?}")]
    NotReady { body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid service URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl HarnessError {
    /// True when the service process died before answering /ping
    pub fn is_service_exited(&self) -> bool {
        matches!(self, HarnessError::ServiceExited(_))
    }
}
