//! IP literal validation
//!
//! Structural check only. Nothing here resolves names or touches the network.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Address family of a validated literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Families in the order they are tried
    const ORDER: [IpFamily; 2] = [IpFamily::V4, IpFamily::V6];

    fn parses(self, candidate: &str) -> bool {
        match self {
            IpFamily::V4 => candidate.parse::<Ipv4Addr>().is_ok(),
            IpFamily::V6 => candidate.parse::<Ipv6Addr>().is_ok(),
        }
    }

    /// Family of `candidate`, or `None` if it is not an IP literal
    pub fn of(candidate: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|family| family.parses(candidate))
    }
}

/// Return `candidate` unchanged if it is a valid IPv4 or IPv6 literal
pub fn validate_ip(candidate: &str) -> Option<&str> {
    IpFamily::of(candidate).map(|_| candidate)
}
