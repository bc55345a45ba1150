// src/core/net.rs
// Blocking HTTP GET; one request per run, no retries.

use std::time::Duration;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Result, SyncError};

/// Fetch `url` and return the body as text.
///
/// Any transport error or non-2xx status is a [`SyncError::Fetch`].
pub fn http_get(url: &str) -> Result<String> {
    let agent = ureq::AgentBuilder::new()
        .timeout_read(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .timeout_write(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build();

    let fetch_err = |reason: String| SyncError::Fetch { url: s!(url), reason };

    let resp = agent.get(url).call().map_err(|e| match e {
        ureq::Error::Status(code, r) => fetch_err(format!("HTTP error: {} {}", code, r.status_text())),
        ureq::Error::Transport(t) => fetch_err(t.to_string()),
    })?;

    tracing::debug!(url, status = resp.status(), "page fetched");
    resp.into_string().map_err(|e| fetch_err(e.to_string()))
}
