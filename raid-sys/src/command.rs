// SPDX-License-Identifier: GPL-3.0-only

//! LVM repair command composition
//!
//! Commands are composed as a single line (`lvscan --cache vg/lv`) and must
//! fit in a fixed-size buffer. A command that would not fit is rejected
//! rather than truncated.

use std::fmt;

use crate::{Result, SysError};

/// Buffer size in bytes, including the terminator byte.
pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 256;

/// The two steps of the repair workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LvmAction {
    /// Refresh cached volume metadata
    Rescan,
    /// Replace failed images according to the configured policy
    Repair,
}

impl LvmAction {
    pub fn template(&self) -> &'static str {
        match self {
            LvmAction::Rescan => "lvscan --cache",
            LvmAction::Repair => {
                "lvconvert --config devices{ignore_suspended_devices=1} --repair --use-policies"
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LvmAction::Rescan => "rescan",
            LvmAction::Repair => "repair",
        }
    }
}

impl fmt::Display for LvmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A composed LVM command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LvmCommand {
    action: LvmAction,
    device: String,
    line: String,
}

impl LvmCommand {
    /// Compose `action` for `device`, failing if the line plus its
    /// terminator exceeds `buffer_size` bytes.
    pub fn build(action: LvmAction, device: &str, buffer_size: usize) -> Result<Self> {
        let line = format!("{} {}", action.template(), device);

        if line.len() >= buffer_size {
            return Err(SysError::CommandBuild {
                command: line,
                capacity: buffer_size,
            });
        }

        Ok(Self {
            action,
            device: device.to_string(),
            line,
        })
    }

    pub fn action(&self) -> LvmAction {
        self.action
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Arguments passed to the `lvm` binary. The device is always a single
    /// argument, whatever characters its name holds.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.action
            .template()
            .split_whitespace()
            .chain(std::iter::once(self.device.as_str()))
    }
}

impl fmt::Display for LvmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
