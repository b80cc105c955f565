// # twod - TwoDNS host IP updater daemon
//
// This daemon is a THIN integration layer: all reconciliation logic lives in
// twod-core and its collaborator crates.
//
// The twod daemon is responsible for:
// 1. Parsing the command line
// 2. Reading and validating the configuration file
// 3. Setting up logging
// 4. Detaching from the terminal and writing the PID file (unless -D)
// 5. Running the poll loop until SIGTERM/SIGINT
//
// ## Usage
//
// ```bash
// twod -c /etc/twod/twodrc -p /var/run/twod.pid
// twod -D -c ~/.twodrc        # stay in the foreground
// ```

mod logging;
mod pidfile;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{debug, error, info};

use twod_core::config::DEFAULT_CONFIG_PATH;
use twod_core::{PollLoop, ReconciliationEngine, TwodConfig};
use twod_ip_http::HttpIpDiscoverer;
use twod_provider_twodns::TwoDnsClient;

use pidfile::{DEFAULT_PIDFILE, PidFile};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum TwodExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<TwodExitCode> for ExitCode {
    fn from(code: TwodExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "twod", version, about = "TwoDNS host IP updater daemon")]
struct Cli {
    /// Load configuration from FILE
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use FILE as pidfile
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_PIDFILE)]
    pidfile: PathBuf,

    /// Do not detach from console
    #[arg(short = 'D', long = "no-detach")]
    no_detach: bool,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        Cli::command()
            .error(
                ErrorKind::InvalidValue,
                format!("'{}' is not a file", path.display()),
            )
            .exit();
    }

    // Load configuration; errors are logged by the bootstrap subscriber
    let config_path = cli.config_path();
    let config = tracing::subscriber::with_default(logging::bootstrap(), || {
        TwodConfig::load(&config_path).inspect_err(|e| error!("{}", e))
    });
    let config = match config {
        Ok(cfg) => cfg,
        Err(_) => return TwodExitCode::ConfigError.into(),
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("{:#}", e);
        return TwodExitCode::ConfigError.into();
    }

    let _pidfile = if cli.no_detach {
        None
    } else {
        match detach_with_pidfile(&cli.pidfile) {
            Ok(pidfile) => Some(pidfile),
            Err(e) => {
                error!("{:#}", e);
                return TwodExitCode::ConfigError.into();
            }
        }
    };

    info!("Starting twod daemon");

    // Single-threaded: every request is awaited before the next step starts
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return TwodExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(config).await {
            Ok(signal) => {
                info!("Received shutdown signal: {}", signal);
                TwodExitCode::CleanShutdown
            }
            Err(e) => {
                error!("Daemon error: {:#}", e);
                TwodExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Detach from the terminal, then claim the PID file
fn detach_with_pidfile(pidfile: &std::path::Path) -> Result<PidFile> {
    // The working directory changes to / when detaching
    let pidfile = std::path::absolute(pidfile)?;
    PidFile::check_writable(&pidfile)?;

    debug!("Moving to background...");
    detach()?;

    let pidfile = PidFile::create(pidfile)?;
    debug!("Wrote PID {} to {}", std::process::id(), pidfile.path().display());
    Ok(pidfile)
}

#[cfg(unix)]
fn detach() -> Result<()> {
    // SAFETY: no threads exist yet; the runtime is built after this returns
    if unsafe { libc::daemon(0, 0) } != 0 {
        anyhow::bail!("Failed to detach: {}", std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn detach() -> Result<()> {
    tracing::warn!("Detaching is not supported on this platform, staying in the foreground");
    Ok(())
}

/// Build the engine and poll until a shutdown signal arrives
///
/// # Returns
///
/// The name of the signal that ended the run.
async fn run_daemon(config: TwodConfig) -> Result<&'static str> {
    let discoverer = HttpIpDiscoverer::from_config(&config)?;
    let host_record = TwoDnsClient::from_config(&config)?;

    let poll = async {
        let engine = ReconciliationEngine::new(Box::new(discoverer), Box::new(host_record)).await;
        let mut poll = PollLoop::new(engine, config.interval());
        info!(
            "Polling every {:?}, discovery mode {}, {} discovery URL(s)",
            poll.interval(),
            config.ip_service.mode,
            config.ip_service.urls().len()
        );
        poll.run().await
    };

    tokio::select! {
        () = poll => Err(anyhow::anyhow!("poll loop exited")),
        signal = wait_for_shutdown() => signal,
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
