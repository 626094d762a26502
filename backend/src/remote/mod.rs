//! Shared plumbing for the remote services a run depends on.
//!
//! A remote failure is never retried: callers propagate the
//! [`RemoteError`] and the run stops.

use reqwest::{Client, Response};

use crate::error::{RemoteError, RemoteResult};
use crate::logs::{log_error, log_success};

/// Turn a transport failure into a [`RemoteError`].
pub fn transport_error(service: &'static str, err: reqwest::Error) -> RemoteError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    RemoteError::Transport { service, message }
}

/// Pass successful responses through; turn anything else into [`RemoteError::Status`].
pub async fn ensure_success(service: &'static str, response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        service,
        status: status.as_u16(),
        body: truncate(&body, 300),
    })
}

/// Check that a service answers `GET url` with a success status.
pub async fn probe_service(client: &Client, url: &str, service: &'static str) -> RemoteResult<()> {
    let result = match client.get(url).send().await {
        Ok(response) => ensure_success(service, response).await.map(|_| ()),
        Err(e) => Err(transport_error(service, e)),
    };

    match &result {
        Ok(()) => log_success(format!("{} API status: OK", service)),
        Err(e) => {
            log_error(format!("{} API status: DOWN", service));
            log_error(format!("{}", e));
            log_error("Try again later or check the network connection.");
        }
    }
    result
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
