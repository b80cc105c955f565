//! Discovery endpoint rotation
//!
//! ```rust
//! use twod_core::{EndpointRotator, RotationMode};
//!
//! let urls = vec!["https://a.example".to_string(), "https://b.example".to_string()];
//! let mut rotator = EndpointRotator::new(urls, RotationMode::RoundRobin).unwrap();
//!
//! assert_eq!(rotator.next(), "https://a.example");
//! assert_eq!(rotator.next(), "https://b.example");
//! assert_eq!(rotator.next(), "https://a.example");
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RotationMode;
use crate::error::{Error, Result};

/// Selection state, one variant per [`RotationMode`]
#[derive(Debug)]
enum Strategy {
    /// Index of the endpoint handed out by the next call
    RoundRobin { next: usize },
    Random(StdRng),
}

/// Picks the next discovery URL from a fixed, non-empty list
#[derive(Debug)]
pub struct EndpointRotator {
    endpoints: Vec<String>,
    strategy: Strategy,
}

impl EndpointRotator {
    /// Create a rotator over `endpoints`
    ///
    /// Random mode is seeded from OS entropy.
    pub fn new(endpoints: Vec<String>, mode: RotationMode) -> Result<Self> {
        let strategy = match mode {
            RotationMode::RoundRobin => Strategy::RoundRobin { next: 0 },
            RotationMode::Random => Strategy::Random(StdRng::from_entropy()),
        };
        Self::with_strategy(endpoints, strategy)
    }

    /// Create a random-mode rotator with a fixed seed
    pub fn random_with_seed(endpoints: Vec<String>, seed: u64) -> Result<Self> {
        Self::with_strategy(endpoints, Strategy::Random(StdRng::seed_from_u64(seed)))
    }

    fn with_strategy(endpoints: Vec<String>, strategy: Strategy) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(Error::config("at least one IP discovery URL is required"));
        }
        Ok(Self { endpoints, strategy })
    }

    /// Select an endpoint and advance the rotation
    pub fn next(&mut self) -> &str {
        let len = self.endpoints.len();
        let index = match &mut self.strategy {
            Strategy::RoundRobin { next } => {
                let current = *next;
                *next = (current + 1) % len;
                current
            }
            Strategy::Random(rng) => rng.gen_range(0..len),
        };
        &self.endpoints[index]
    }

    /// The configured endpoints, in configuration order
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn mode(&self) -> RotationMode {
        match self.strategy {
            Strategy::RoundRobin { .. } => RotationMode::RoundRobin,
            Strategy::Random(_) => RotationMode::Random,
        }
    }
}
