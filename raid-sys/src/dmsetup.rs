// SPDX-License-Identifier: GPL-3.0-only

//! Device-mapper table status via `dmsetup`

use std::path::PathBuf;
use std::process::Command;

use raid_types::TargetRecord;
use tracing::{debug, warn};
use which::which;

use crate::{Result, SysError};

/// One device-mapper status query: the device name and its target records
/// in table order.
pub trait DmTask {
    fn name(&self) -> &str;

    fn targets(&self) -> &[TargetRecord];
}

/// An already-collected status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTask {
    name: String,
    targets: Vec<TargetRecord>,
}

impl StatusTask {
    pub fn new(name: impl Into<String>, targets: Vec<TargetRecord>) -> Self {
        Self {
            name: name.into(),
            targets,
        }
    }

    /// Build from `dmsetup status <name>` output.
    pub fn from_status_output(name: impl Into<String>, output: &str) -> Self {
        Self::new(name, parse_status_output(output))
    }
}

impl DmTask for StatusTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn targets(&self) -> &[TargetRecord] {
        &self.targets
    }
}

/// Parse `<start> <length> <target_type> <params...>` lines.
///
/// An empty table yields no records.
pub fn parse_status_output(output: &str) -> Vec<TargetRecord> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }

            let mut words = line.split_whitespace();
            let start = words.next()?.parse::<u64>().ok();
            let length = words.next()?.parse::<u64>().ok();
            let (Some(start), Some(length)) = (start, length) else {
                warn!("Skipping unparsable status line: {line}");
                return None;
            };

            let target_type = words.next().map(ToString::to_string);
            let params = words.collect::<Vec<_>>().join(" ");

            Some(TargetRecord {
                start,
                length,
                target_type,
                params,
            })
        })
        .collect()
}

/// `dmsetup` CLI wrapper
pub struct Dmsetup {
    binary_path: PathBuf,
}

impl Dmsetup {
    /// Locate the `dmsetup` binary; `binary` may be a name or a path.
    pub fn new(binary: &str) -> Result<Self> {
        let binary_path = which(binary)
            .map_err(|e| SysError::OperationFailed(format!("{binary} not found: {e}")))?;
        debug!("Found dmsetup binary at {:?}", binary_path);
        Ok(Self { binary_path })
    }

    /// Query the status of one device.
    pub fn status(&self, name: &str) -> Result<StatusTask> {
        let output = Command::new(&self.binary_path)
            .arg("status")
            .arg(name)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SysError::CommandExec {
                command: format!("dmsetup status {name}"),
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(StatusTask::from_status_output(name, &stdout))
    }
}
