//! Notification of termination signals.

use std::sync::mpsc::{self, Receiver};

use thiserror::Error;

/// Failure installing the signal handler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShutdownError {
    /// The handler could not be installed, for example because one is
    /// already registered for this process.
    #[error("failed to install signal handler: {0}")]
    Install(#[from] ctrlc::Error),
}

/// Install a handler for SIGINT and SIGTERM and return a channel that
/// receives `()` each time one arrives.
///
/// Only one handler can exist per process; a second call fails.
///
/// # Errors
///
/// Returns [`ShutdownError::Install`] when the handler cannot be installed.
///
/// # Examples
///
/// ```no_run
/// let shutdown = cliutil::shutdown_listener()?;
/// shutdown.recv().ok();
/// // clean up and exit
/// # Ok::<(), cliutil::ShutdownError>(())
/// ```
pub fn shutdown_listener() -> Result<Receiver<()>, ShutdownError> {
    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        if tx.send(()).is_err() {
            tracing::debug!("shutdown receiver dropped");
        }
    })?;
    Ok(rx)
}
