//! Fixed-period poll loop

use std::time::Duration;
use tracing::trace;

use super::ReconciliationEngine;

/// Runs [`ReconciliationEngine::cycle`] every `interval`, forever
///
/// No jitter, no catch-up after a slow cycle, no backoff. The loop has no
/// shutdown path of its own; the process ends it by dropping the future.
pub struct PollLoop {
    engine: ReconciliationEngine,
    interval: Duration,
}

impl PollLoop {
    pub fn new(engine: ReconciliationEngine, interval: Duration) -> Self {
        Self { engine, interval }
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cycle, then sleep, forever
    pub async fn run(&mut self) {
        loop {
            let outcome = self.engine.cycle().await;
            trace!(?outcome, "Cycle finished, sleeping for {:?}", self.interval);
            tokio::time::sleep(self.interval).await;
        }
    }
}
