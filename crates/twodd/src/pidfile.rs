//! PID file handling for detached runs

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Default PID file location
pub const DEFAULT_PIDFILE: &str = "/var/run/twod.pid";

/// An exclusively created PID file, removed again on drop
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Fail early if the PID file could not be written later
    ///
    /// Called before detaching, while errors can still reach the terminal.
    pub fn check_writable(path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        if !dir_writable(dir) {
            bail!("Unable to write pidfile {}", path.display());
        }
        Ok(())
    }

    /// Create the PID file and write the current process ID into it
    ///
    /// An existing file means another instance holds it.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => bail!(
                "pidfile {} already exists, is twod already running?",
                path.display()
            ),
            Err(e) => {
                return Err(e).with_context(|| format!("Unable to write pidfile {}", path.display()));
            }
        };

        // From here on the file is ours; drop removes it if writing fails
        let pidfile = Self { path };
        writeln!(file, "{}", std::process::id())
            .with_context(|| format!("Unable to write pidfile {}", pidfile.path.display()))?;
        Ok(pidfile)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove pidfile {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(unix)]
fn dir_writable(dir: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string that outlives the call
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK | libc::X_OK) == 0 }
}

#[cfg(not(unix))]
fn dir_writable(dir: &Path) -> bool {
    std::fs::metadata(dir)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false)
}
