//! Configuration types for twod
//!
//! The configuration file is TOML with three sections:
//!
//! ```toml
//! [general]
//! user = "me@example.com"
//! token = "secret"
//! host_url = "https://api.twodns.de/hosts/myhost.dd-dns.de"
//! interval = 3600
//! timeout = 16
//! redirects = 2
//!
//! [ip_service]
//! mode = "random"
//! ip_urls = "https://ip.tablet-mode.net https://icanhazip.com"
//!
//! [logging]
//! level = "WARNING"
//! ```
//!
//! Every problem found while reading or validating it is an
//! [`Error::Config`](crate::Error::Config); the daemon treats those as fatal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/twod/twodrc";

/// Main twod configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwodConfig {
    /// Account, host record and polling settings
    pub general: GeneralConfig,

    /// External IP discovery settings
    pub ip_service: IpServiceConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TwodConfig {
    /// Read, parse and validate a configuration file
    ///
    /// A leading `~/` in `path` is expanded to the user's home directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_home(path.as_ref());
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;

        Self::from_toml_str(&contents)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), config_message(e))))
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| Error::config(e.message()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.general.validate()?;
        self.ip_service.validate()?;
        Ok(())
    }

    /// Credentials for the host-record service
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.general.user.clone(), self.general.token.clone())
    }

    /// Timeout and redirect policy shared by every request
    pub fn connection_policy(&self) -> ConnectionPolicy {
        ConnectionPolicy::new(self.general.timeout, self.general.redirects)
    }

    /// Poll period
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.general.interval)
    }
}

fn config_message(err: Error) -> String {
    match err {
        Error::Config(msg) => msg,
        other => other.to_string(),
    }
}

/// `[general]` section
#[derive(Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// TwoDNS account name
    pub user: String,

    /// TwoDNS API token
    /// ⚠️ NEVER log this value
    pub token: String,

    /// Host record endpoint
    pub host_url: String,

    /// Poll period in seconds
    #[serde(default = "default_interval")]
    pub interval: f64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: f64,

    /// Maximum redirects per request
    #[serde(default = "default_redirects")]
    pub redirects: usize,
}

impl GeneralConfig {
    fn validate(&self) -> Result<()> {
        if self.user.is_empty() {
            return Err(Error::config("general.user cannot be empty"));
        }
        if self.token.is_empty() {
            return Err(Error::config("general.token cannot be empty"));
        }
        check_url(&self.host_url)?;

        check_seconds("general.interval", self.interval)?;
        check_seconds("general.timeout", self.timeout)?;
        Ok(())
    }
}

// Custom Debug implementation that hides the token
impl fmt::Debug for GeneralConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneralConfig")
            .field("user", &self.user)
            .field("token", &"<REDACTED>")
            .field("host_url", &self.host_url)
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("redirects", &self.redirects)
            .finish()
    }
}

fn default_interval() -> f64 {
    3600.0
}

fn default_timeout() -> f64 {
    16.0
}

fn default_redirects() -> usize {
    2
}

/// `[ip_service]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpServiceConfig {
    /// Endpoint selection policy
    #[serde(default)]
    pub mode: RotationMode,

    /// Space-separated discovery URLs
    pub ip_urls: String,
}

impl IpServiceConfig {
    /// Discovery URLs in configuration order
    pub fn urls(&self) -> Vec<String> {
        self.ip_urls.split_whitespace().map(str::to_string).collect()
    }

    fn validate(&self) -> Result<()> {
        let urls = self.urls();
        if urls.is_empty() {
            return Err(Error::config("ip_service.ip_urls must list at least one URL"));
        }
        for url in &urls {
            check_url(url)?;
        }
        Ok(())
    }
}

/// Positive and representable as a [`Duration`]
fn check_seconds(key: &str, secs: f64) -> Result<()> {
    if secs > 0.0 && Duration::try_from_secs_f64(secs).is_ok() {
        return Ok(());
    }
    Err(Error::config(format!(
        "{} must be a positive number of seconds. Got: {}",
        key, secs
    )))
}

fn check_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::config(format!(
            "Invalid URL: '{}' - has to start with 'http(s)'",
            url
        )))
    }
}

/// How the next discovery endpoint is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Uniformly random on every call
    #[default]
    Random,
    /// Strict cyclic order, starting at the first URL
    RoundRobin,
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RotationMode::Random => "random",
            RotationMode::RoundRobin => "round_robin",
        })
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum severity
    #[serde(default)]
    pub level: LogLevel,

    /// Optional file receiving a copy of every log line
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Log severity, named the way the configuration file names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// The tracing level this severity maps to
    ///
    /// tracing has no level above ERROR, so CRITICAL shares it.
    pub fn as_tracing(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(Error::config(format!(
                "Invalid log level: '{}'. Valid levels: DEBUG, INFO, WARNING, ERROR, CRITICAL",
                s
            ))),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
        .to_string()
    }
}

/// HTTP Basic credentials for the host-record service
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    /// ⚠️ NEVER log this value
    pub token: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

/// Bounds applied to every HTTP request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPolicy {
    timeout_secs: f64,
    max_redirects: usize,
}

impl ConnectionPolicy {
    /// Create a policy
    ///
    /// `timeout_secs` must be finite and positive, which
    /// [`TwodConfig::validate`] guarantees for loaded configurations.
    pub fn new(timeout_secs: f64, max_redirects: usize) -> Self {
        Self {
            timeout_secs,
            max_redirects,
        }
    }

    /// Configured timeout in seconds, as written in the configuration
    pub fn timeout_secs(&self) -> f64 {
        self.timeout_secs
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self::new(default_timeout(), default_redirects())
    }
}

/// Expand a leading `~/` to `$HOME`
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}
