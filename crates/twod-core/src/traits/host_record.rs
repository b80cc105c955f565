// # Host Record Service Trait
//
// Defines the interface to the dynamic-DNS provider holding the host record.
//
// ## Implementations
//
// - TwoDNS: `twod-provider-twodns` crate

use async_trait::async_trait;

/// Trait for the service storing the host record's IP
///
/// Both calls are single-shot. Implementations must not retry, must not cache
/// the recorded IP and must not decide whether an update is needed; that is
/// the engine's job.
#[async_trait]
pub trait HostRecordService: Send + Sync {
    /// Fetch the IP currently stored for the host
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: a valid IP literal
    /// - `Err(Error)`: the request failed or the stored value is not an IP
    async fn fetch_recorded(&self) -> Result<String, crate::Error>;

    /// Store `new_ip` for the host
    ///
    /// `Ok(())` means the service confirmed the change with a 2xx status.
    /// Any error means the update must be treated as not applied.
    async fn update(&self, new_ip: &str) -> Result<(), crate::Error>;
}
