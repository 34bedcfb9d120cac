//! Named Pipe Lifecycle
//!
//! Creates the FIFO sensors write into, opens its read end for the
//! ingestor and unlinks it once ingestion is over.

use crate::error::MonitorError;
use std::ffi::CString;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Permission bits for a freshly created pipe (before umask)
const PIPE_MODE: libc::mode_t = 0o666;

/// A named pipe owned by the monitor
#[derive(Debug)]
pub struct SensorPipe {
    path: PathBuf,
    released: bool,
}

impl SensorPipe {
    /// Create the FIFO, replacing any stale file at the same path
    pub fn create(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let path = path.as_ref().to_path_buf();
        let pipe_error = |source| MonitorError::Pipe {
            path: path.clone(),
            source,
        };

        match make_fifo(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                warn!("Pipe {} already exists, recreating it", path.display());
                fs::remove_file(&path).map_err(pipe_error)?;
                make_fifo(&path).map_err(pipe_error)?;
            }
            Err(e) => return Err(pipe_error(e)),
        }

        info!("Created pipe {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Path of the FIFO
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the read end; blocks until a sensor opens the write end
    pub fn open_reader(&self) -> Result<BufReader<File>, MonitorError> {
        debug!("Waiting for a sensor to open {}", self.path.display());
        let file = File::open(&self.path).map_err(|source| MonitorError::Pipe {
            path: self.path.clone(),
            source,
        })?;
        info!("Sensor attached to {}", self.path.display());
        Ok(BufReader::new(file))
    }

    /// Unlink the FIFO so no further sensors can attach
    pub fn release(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed pipe {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for SensorPipe {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to remove pipe {}: {}", self.path.display(), e);
        }
    }
}

fn make_fifo(path: &Path) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pipe path contains NUL"))?;

    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), PIPE_MODE) };
    if rc == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}
