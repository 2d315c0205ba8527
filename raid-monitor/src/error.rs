// SPDX-License-Identifier: GPL-3.0-only

use raid_sys::SysError;
use thiserror::Error;

/// Malformed `raid` status line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected 4 status fields, found {found}")]
    TokenCount { found: usize },

    #[error("invalid number of devices: {value:?}")]
    BadCount { value: String },

    #[error("resync ratio has no '/' separator: {value:?}")]
    MissingSeparator { value: String },
}

/// Monitor error types
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Failed to process status line for {device}: {source}")]
    Parse {
        device: String,
        #[source]
        source: ParseError,
    },

    #[error("{device} reports {expected} devices but only {found} health characters")]
    HealthBounds {
        device: String,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Sys(#[from] SysError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            MonitorError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
