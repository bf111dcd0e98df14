//! Fatal failure taxonomy and the exit codes it maps to.

use thiserror::Error;

/// Failures that abort a purge run.
///
/// Non-fatal problems (an unreadable optional input, a failed large-object
/// scan) are logged as warnings instead and never surface here.
#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("Working tree is dirty; commit or stash changes, or re-run with --allow-dirty")]
    DirtyWorkingTree,

    #[error("{tool} not found. {remedy}")]
    CapabilityMissing { tool: String, remedy: String },

    #[error("`{command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("Confirmation not received; aborting {action}")]
    ConfirmationDenied { action: String },
}

impl PurgeError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            PurgeError::DirtyWorkingTree => 1,
            PurgeError::CapabilityMissing { .. } => 2,
            PurgeError::ConfirmationDenied { .. } => 3,
            PurgeError::Command { .. } => EXIT_FAILURE,
        }
    }
}

/// Exit code for command failures and any other unexpected error
pub const EXIT_FAILURE: i32 = 4;
