//! Error types for the synchronizer.

use std::process::ExitStatus;
use thiserror::Error;

/// Errors surfaced by the collaborator plumbing.
///
/// None of these are fatal to the daemon: dump failures degrade the
/// affected domain to an empty snapshot, and a stream failure only ends
/// the monitor task.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Spawning an external toolkit command failed.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external toolkit command ran but exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// Reading from the monitor stream failed.
    #[error("monitor stream error: {0}")]
    Stream(#[from] std::io::Error),
}

impl SyncError {
    /// Creates a [`SyncError::Spawn`].
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        SyncError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Creates a [`SyncError::CommandFailed`].
    pub fn command_failed(
        command: impl Into<String>,
        status: ExitStatus,
        stderr: impl Into<String>,
    ) -> Self {
        SyncError::CommandFailed {
            command: command.into(),
            status,
            stderr: stderr.into(),
        }
    }
}

/// Result type alias for synchronizer operations.
pub type Result<T> = std::result::Result<T, SyncError>;
