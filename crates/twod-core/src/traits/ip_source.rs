// # IP Discoverer Trait
//
// Defines the interface for finding out the machine's current public IP.
//
// ## Implementations
//
// - HTTP echo services with endpoint rotation: `twod-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use twod_core::{IpDiscoverer, Operation};
//
// let mut discoverer = /* IpDiscoverer implementation */;
//
// match discoverer.discover().await {
//     Ok(ip) => println!("external IP: {}", ip),
//     Err(e) => e.report(Operation::DiscoverExternalIp),
// }
// ```

use async_trait::async_trait;

/// Trait for external IP discovery
///
/// Implementations perform exactly one lookup per call and never retry: the
/// next poll cycle is the retry. A returned IP has already passed
/// [`validate_ip`](crate::validate_ip).
///
/// Discovery takes `&mut self` because choosing the endpoint advances
/// rotation state.
#[async_trait]
pub trait IpDiscoverer: Send {
    /// Discover the current public IP
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: a valid IPv4 or IPv6 literal
    /// - `Err(Error)`: the lookup failed or returned something that is not an
    ///   IP literal ([`Error::InvalidIp`](crate::Error::InvalidIp))
    async fn discover(&mut self) -> Result<String, crate::Error>;
}
