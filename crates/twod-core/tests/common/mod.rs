//! Test doubles and common utilities for engine contract tests
//!
//! The doubles keep their counters behind `Arc`s so a test can hand one copy
//! to the engine and keep another to inspect afterwards.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use twod_core::error::{Error, Result};
use twod_core::traits::{HostRecordService, IpDiscoverer};

/// One scripted discovery result
#[derive(Debug, Clone)]
pub enum Step {
    Ip(&'static str),
    Transport,
    Timeout(f64),
    Redirects,
    Invalid(&'static str),
    Unexpected,
}

impl Step {
    fn into_result(self) -> Result<String> {
        match self {
            Step::Ip(ip) => Ok(ip.to_string()),
            Step::Transport => Err(Error::transport("connection refused")),
            Step::Timeout(secs) => Err(Error::Timeout { secs }),
            Step::Redirects => Err(Error::TooManyRedirects),
            Step::Invalid(value) => Err(Error::invalid_ip(value)),
            Step::Unexpected => Err(Error::other("something nobody planned for")),
        }
    }
}

/// An IpDiscoverer replaying a script; the last step repeats forever
#[derive(Clone)]
pub struct ScriptedDiscoverer {
    script: Arc<Mutex<VecDeque<Step>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedDiscoverer {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: Arc::new(Mutex::new(steps.into_iter().collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times discover() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpDiscoverer for ScriptedDiscoverer {
    async fn discover(&mut self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        let step = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().expect("script must not be empty")
        };
        step.into_result()
    }
}

/// A HostRecordService that records calls
#[derive(Clone)]
pub struct MockHostRecord {
    /// What fetch_recorded() returns; None means the fetch fails
    recorded: Option<&'static str>,
    fetch_calls: Arc<AtomicUsize>,
    updates: Arc<Mutex<Vec<String>>>,
    fail_updates: Arc<AtomicBool>,
}

impl MockHostRecord {
    pub fn recording(ip: &'static str) -> Self {
        Self::build(Some(ip))
    }

    pub fn unreachable() -> Self {
        Self::build(None)
    }

    fn build(recorded: Option<&'static str>) -> Self {
        Self {
            recorded,
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
            fail_updates: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make subsequent update() calls fail (or succeed again)
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// IPs passed to update(), in call order
    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HostRecordService for MockHostRecord {
    async fn fetch_recorded(&self) -> Result<String> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.recorded
            .map(str::to_string)
            .ok_or_else(|| Error::transport("503 Service Unavailable"))
    }

    async fn update(&self, new_ip: &str) -> Result<()> {
        self.updates.lock().unwrap().push(new_ip.to_string());
        if self.fail_updates.load(Ordering::SeqCst) {
            Err(Error::transport("500 Internal Server Error"))
        } else {
            Ok(())
        }
    }
}

/// Collects formatted log lines for the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route this thread's tracing events into the capture until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines emitted at `level` ("DEBUG", "INFO", "WARN", "ERROR")
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
