//! HTTP client policy
//!
//! Both the discovery endpoints and the host-record service are reached with
//! the same bounds: TLS verification on, a per-request timeout and a redirect
//! limit. Failures are folded into the [`Error`] taxonomy here so every caller
//! reports them the same way.

use reqwest::redirect::Policy;

use crate::config::ConnectionPolicy;
use crate::error::{Error, Result};

/// Build a client enforcing `policy`
pub fn build_client(policy: &ConnectionPolicy) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(policy.timeout())
        .redirect(Policy::limited(policy.max_redirects()))
        .build()
        .map_err(|e| Error::other(format!("Failed to build HTTP client: {}", e)))
}

/// Map a reqwest failure onto the error taxonomy
///
/// Timeouts carry the configured duration so the log line can name it.
pub fn classify(err: reqwest::Error, policy: &ConnectionPolicy) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            secs: policy.timeout_secs(),
        }
    } else if err.is_redirect() {
        Error::TooManyRedirects
    } else if err.is_connect() || err.is_status() || err.is_request() || err.is_body() {
        Error::transport(err.to_string())
    } else {
        Error::other(err.to_string())
    }
}
