// SPDX-License-Identifier: GPL-3.0-only

//! Monitor configuration
//!
//! Read from TOML. Every field has a default, so an empty or missing file
//! yields the stock behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use raid_sys::DEFAULT_COMMAND_BUFFER_SIZE;
use raid_types::RAID_TARGET_TYPE;
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

pub const CONFIG_ENV: &str = "RAID_MONITOR_CONFIG";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/raid-monitor/config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// `lvm` binary used to run repair commands
    pub lvm_binary: String,

    /// `dmsetup` binary used by the CLI to query table status
    pub dmsetup_binary: String,

    /// Command buffer size in bytes, terminator included
    pub command_buffer_size: usize,

    /// Device-mapper target type handled by this monitor
    pub raid_target_type: String,

    /// Translate device-mapper names (`vg-lv`) into `vg/lv` for LVM commands
    pub translate_dm_names: bool,

    /// Reject status lines that carry more than the four classic fields
    pub strict_token_count: bool,

    pub logging: LoggingConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            lvm_binary: "lvm".to_string(),
            dmsetup_binary: "dmsetup".to_string(),
            command_buffer_size: DEFAULT_COMMAND_BUFFER_SIZE,
            raid_target_type: RAID_TARGET_TYPE.to_string(),
            translate_dm_names: true,
            strict_token_count: true,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LoggingLevel,
    pub log_to_disk: bool,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    pub fn as_directive(&self) -> &'static str {
        match self {
            LoggingLevel::Error => "error",
            LoggingLevel::Warn => "warn",
            LoggingLevel::Info => "info",
            LoggingLevel::Debug => "debug",
            LoggingLevel::Trace => "trace",
        }
    }
}

impl MonitorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: MonitorConfig =
            toml::from_str(raw).map_err(|e| MonitorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| MonitorError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Load from `explicit`, then `$RAID_MONITOR_CONFIG`, then the system
    /// path if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match resolve_config_path(explicit) {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.command_buffer_size == 0 {
            return Err(MonitorError::Config(
                "command_buffer_size must be greater than zero".to_string(),
            ));
        }

        if self.raid_target_type.trim().is_empty() {
            return Err(MonitorError::Config(
                "raid_target_type must not be empty".to_string(),
            ));
        }

        if self.lvm_binary.trim().is_empty() {
            return Err(MonitorError::Config("lvm_binary must not be empty".to_string()));
        }

        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }

    let system = PathBuf::from(SYSTEM_CONFIG_PATH);
    system.exists().then_some(system)
}
