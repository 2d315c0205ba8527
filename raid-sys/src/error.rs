// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command does not fit in {capacity}-byte buffer: {command}")]
    CommandBuild { command: String, capacity: usize },

    #[error("{command} failed: {stderr}")]
    CommandExec { command: String, stderr: String },

    #[error("shared command resource unavailable: {0}")]
    ResourceAcquire(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;
