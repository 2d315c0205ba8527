// SPDX-License-Identifier: GPL-3.0-only

//! Low-level system operations for the RAID event monitor
//!
//! This crate owns everything that talks to the host system:
//! - Composing LVM repair commands into a bounded command buffer
//! - Executing them through the `lvm` binary
//! - Reading device-mapper table status through `dmsetup`
//!
//! The `CommandRunner` and `DmTask` traits are the seams the monitor core is
//! written against, so it can be driven without touching real devices.

pub mod command;
pub mod dmsetup;
pub mod error;
pub mod runner;

pub use command::{DEFAULT_COMMAND_BUFFER_SIZE, LvmAction, LvmCommand};
pub use dmsetup::{DmTask, Dmsetup, StatusTask, parse_status_output};
pub use error::{Result, SysError};
pub use runner::{CommandRunner, SystemCommandRunner};
