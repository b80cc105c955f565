// # twod-core
//
// Core library for the twod TwoDNS host IP updater.
//
// ## Architecture Overview
//
// - **EndpointRotator**: picks the next external IP discovery URL
// - **validate_ip**: purely syntactic IPv4/IPv6 literal check
// - **IpDiscoverer**: trait for discovering the current public IP
// - **HostRecordService**: trait for reading and writing the recorded IP
// - **ReconciliationEngine**: owns the last-known IP and runs one
//   discover → compare → update cycle
// - **PollLoop**: runs the engine at a fixed interval, forever
//
// ## Failure Policy
//
// Nothing that happens on the network is fatal. Collaborators return
// classified errors, the engine absorbs them and logs them at the severity
// matching their class, and the next poll cycle is the only retry.
// Configuration errors are the only fatal path and happen before the
// poll loop starts.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod rotator;
pub mod traits;
pub mod validate;

// Re-export core types for convenience
pub use config::{ConnectionPolicy, Credentials, LogLevel, RotationMode, TwodConfig};
pub use engine::{CycleOutcome, PollLoop, ReconciliationEngine};
pub use error::{Error, Operation, Result};
pub use rotator::EndpointRotator;
pub use traits::{HostRecordService, IpDiscoverer};
pub use validate::{IpFamily, validate_ip};
