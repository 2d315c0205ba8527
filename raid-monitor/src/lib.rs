// SPDX-License-Identifier: GPL-3.0-only

//! Device-mapper RAID event monitor
//!
//! Watches LVM RAID logical volumes and repairs them when a member device
//! fails. For each kernel event on a monitored volume:
//!
//! 1. every target record of the table is visited in order
//! 2. `raid` status lines are parsed and the health characters scanned
//! 3. on a failed device, `lvscan --cache` and then
//!    `lvconvert --repair --use-policies` are run for the volume
//!
//! Command execution is serialized through one process-wide lock; see
//! [`dispatch::SharedRunner`].

pub mod config;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod logging;
pub mod parser;
pub mod plugin;
pub mod repair;

pub use config::{LoggingConfig, LoggingLevel, MonitorConfig};
pub use dispatch::{EventDispatcher, EventReport, SharedRunner, TargetOutcome};
pub use error::{MonitorError, ParseError, Result};
pub use health::evaluate;
pub use lifecycle::MonitorLifecycle;
pub use parser::{StatusParser, parse_status_line};
pub use plugin::RaidMonitor;
pub use repair::RepairInvoker;
