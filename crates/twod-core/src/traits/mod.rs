//! Core traits for twod
//!
//! The engine only talks to its network collaborators through these traits:
//!
//! - [`IpDiscoverer`]: find out the current public IP
//! - [`HostRecordService`]: read and write the IP stored by the DNS provider

pub mod host_record;
pub mod ip_source;

pub use host_record::HostRecordService;
pub use ip_source::IpDiscoverer;
