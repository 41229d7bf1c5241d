//! Shared HTTP plumbing for the backend clients.

use crate::config::BackendConfig;
use crate::{Result, VaultError};
use reqwest::{Response, StatusCode};
use std::time::Duration;

pub(crate) fn build_client(config: &BackendConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| VaultError::Config(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn transport_error(e: reqwest::Error) -> VaultError {
    VaultError::StoreUnavailable(e.to_string())
}

/// Pass successful responses through; map the rest onto the error taxonomy.
pub(crate) async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_else(|_| "unknown".to_string());
    Err(status_error(status, &body))
}

pub(crate) fn status_error(status: StatusCode, body: &str) -> VaultError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VaultError::AuthenticationRequired,
        _ => VaultError::StoreUnavailable(format!("Backend error {}: {}", status, body)),
    }
}
