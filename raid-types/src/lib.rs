// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for the device-mapper RAID event monitor
//!
//! These types are shared by the whole stack:
//!
//! - **raid-sys**: produces `TargetRecord`s from device-mapper status output
//!   and reports command results
//! - **raid-monitor**: parses records into `RaidStatusRecord`s, evaluates them
//!   and tracks `MonitoringSession`s
//!
//! Nothing here performs I/O.

pub mod device;
pub mod repair;
pub mod status;
pub mod target;

pub use device::{DeviceIdentity, MonitoringSession, lv_path_from_dm_name};
pub use repair::RepairOutcome;
pub use status::{HealthState, HealthVerdict, RaidStatusRecord};
pub use target::{EventMask, EventType, RAID_TARGET_TYPE, TargetRecord};
