// # TwoDNS Host Record Client
//
// This crate reads and writes the IP address TwoDNS stores for one host.
//
// ## Behavior
//
// - One HTTP request per call, no retry, no backoff (the poll loop retries)
// - HTTP Basic auth with the account name and API token on every request
// - TLS verification on, configured timeout and redirect limit
// - No caching: the engine owns the last-known IP
//
// ## Security Requirements
//
// - The API token NEVER appears in logs or Debug output
//
// ## API Reference
//
// - Read host:   GET `<host_url>` → `{"ip_address": "203.0.113.4", ...}`
// - Update host: PUT `<host_url>` with `{"ip_address": "203.0.113.5"}`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use twod_core::http::{build_client, classify};
use twod_core::traits::HostRecordService;
use twod_core::{ConnectionPolicy, Credentials, Error, Result, TwodConfig, validate_ip};

/// Host record as returned by GET; fields other than the IP are ignored
#[derive(Debug, Deserialize)]
struct HostRecord {
    ip_address: String,
}

/// Body of the PUT request
#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    ip_address: &'a str,
}

/// TwoDNS host record client
pub struct TwoDnsClient {
    /// Host record endpoint
    url: String,

    /// Account name and API token
    /// ⚠️ NEVER log the token
    credentials: Credentials,

    /// Timeout and redirect bounds
    policy: ConnectionPolicy,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for TwoDnsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoDnsClient")
            .field("url", &self.url)
            .field("credentials", &self.credentials)
            .field("policy", &self.policy)
            .finish()
    }
}

impl TwoDnsClient {
    /// Create a new TwoDNS client
    ///
    /// # Parameters
    ///
    /// - `url`: The host record endpoint, e.g.
    ///   `https://api.twodns.de/hosts/myhost.dd-dns.de`
    /// - `credentials`: Account name and API token
    /// - `policy`: Timeout and redirect limit for every request
    pub fn new(
        url: impl Into<String>,
        credentials: Credentials,
        policy: ConnectionPolicy,
    ) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            credentials,
            policy,
            client: build_client(&policy)?,
        })
    }

    /// Create from the `[general]` configuration section
    pub fn from_config(config: &TwodConfig) -> Result<Self> {
        Self::new(
            config.general.host_url.clone(),
            config.credentials(),
            config.connection_policy(),
        )
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, &self.url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.token))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| classify(e, &self.policy))
    }
}

#[async_trait]
impl HostRecordService for TwoDnsClient {
    /// Fetch the IP TwoDNS stores for the host
    ///
    /// A body that is not a JSON object with a string `ip_address` is an
    /// unexpected error; a well-formed record holding something that is not
    /// an IP literal is [`Error::InvalidIp`].
    async fn fetch_recorded(&self) -> Result<String> {
        let response = self.send(self.request(reqwest::Method::GET)).await?;
        let body = response
            .text()
            .await
            .map_err(|e| classify(e, &self.policy))?;

        let record: HostRecord = serde_json::from_str(&body)?;
        debug!("TwoDNS returned {}", record.ip_address);

        match validate_ip(&record.ip_address) {
            Some(_) => Ok(record.ip_address),
            None => Err(Error::invalid_ip(record.ip_address)),
        }
    }

    /// Store a new IP for the host
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT <host_url>
    /// Authorization: Basic <user:token>
    /// Content-Type: application/json
    ///
    /// {"ip_address": "203.0.113.5"}
    /// ```
    async fn update(&self, new_ip: &str) -> Result<()> {
        debug!("Updating recorded IP...");
        let request = self
            .request(reqwest::Method::PUT)
            .json(&UpdateRequest { ip_address: new_ip });

        self.send(request).await?;

        info!("IP changed to {}.", new_ip);
        Ok(())
    }
}
