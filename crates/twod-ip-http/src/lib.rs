// # HTTP IP Discoverer
//
// This crate discovers the machine's public IP by asking HTTP echo services
// (e.g. icanhazip.com, ifconfig.me/ip) that answer with the caller's address
// as plain text.
//
// ## Architecture
//
// Each call to `discover()` takes the next URL from an `EndpointRotator`,
// issues one GET under the configured timeout and redirect limit, trims
// trailing whitespace from the body and validates it as an IP literal.
// There is no retry and no caching; the poll loop calls again next interval.

use async_trait::async_trait;
use tracing::debug;

use twod_core::http::{build_client, classify};
use twod_core::traits::IpDiscoverer;
use twod_core::{ConnectionPolicy, EndpointRotator, Error, Result, TwodConfig, validate_ip};

/// IP discoverer backed by HTTP echo services
pub struct HttpIpDiscoverer {
    /// Chooses the service for each lookup
    rotator: EndpointRotator,

    /// Timeout and redirect bounds
    policy: ConnectionPolicy,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpDiscoverer {
    /// Create a new HTTP IP discoverer
    pub fn new(rotator: EndpointRotator, policy: ConnectionPolicy) -> Result<Self> {
        Ok(Self {
            rotator,
            policy,
            client: build_client(&policy)?,
        })
    }

    /// Create from the `[ip_service]` and `[general]` configuration
    pub fn from_config(config: &TwodConfig) -> Result<Self> {
        let rotator = EndpointRotator::new(config.ip_service.urls(), config.ip_service.mode)?;
        Self::new(rotator, config.connection_policy())
    }

    /// Fetch the current IP from one service
    async fn fetch_ip(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| classify(e, &self.policy))?;

        let body = response
            .text()
            .await
            .map_err(|e| classify(e, &self.policy))?;

        let ip = body.trim_end();
        validate_ip(ip)
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_ip(ip))
    }
}

#[async_trait]
impl IpDiscoverer for HttpIpDiscoverer {
    async fn discover(&mut self) -> Result<String> {
        let url = self.rotator.next().to_string();
        debug!("Fetching external IP from {}...", url);
        self.fetch_ip(&url).await
    }
}
