//! Outbound HTTP helpers
//!
//! Every external service this crate talks to (OpenAI, Anthropic, Flowise,
//! n8n) goes through `reqwest`. The helpers here build clients and turn a
//! non-2xx response into a typed failure before the caller touches the body.

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::warn;

/// Build an HTTP client, optionally with a per-request timeout.
///
/// Without a timeout the transport default applies; a hung backend hangs the
/// request that called it.
pub fn build_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        warn!(
            "Falling back to default HTTP client, timeout {:?} not applied: {}",
            timeout, e
        );
        Client::new()
    })
}

/// Failure status captured from a non-2xx response
#[derive(Debug, Clone)]
pub struct HttpFailure {
    pub status: StatusCode,
    pub body: String,
}

impl HttpFailure {
    /// Canonical reason phrase for the status ("Internal Server Error", ...)
    pub fn status_text(&self) -> String {
        self.status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| self.status.as_u16().to_string())
    }
}

/// Pass a successful response through, or read the error body and return it
/// as an [`HttpFailure`].
pub async fn check_status(response: Response) -> Result<Response, HttpFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(HttpFailure { status, body })
}
