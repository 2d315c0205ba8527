// SPDX-License-Identifier: GPL-3.0-only

//! Execution of composed LVM commands

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};
use which::which;

use crate::command::LvmCommand;
use crate::{Result, SysError};

/// The shared command-execution resource.
///
/// `acquire`/`release` bracket a device's monitoring lifetime and may be
/// called once per monitored device; implementations do their own reference
/// counting. `run` blocks until the command finishes and returns
/// `SysError::CommandExec` when it reports failure.
pub trait CommandRunner: Send {
    fn acquire(&mut self) -> Result<()>;

    fn release(&mut self);

    fn run(&mut self, command: &LvmCommand) -> Result<()>;
}

/// Runs commands through the system `lvm` binary.
pub struct SystemCommandRunner {
    /// Binary name or path, resolved on first acquire
    binary: String,
    resolved: Option<PathBuf>,
    references: usize,
    dry_run: bool,
}

impl SystemCommandRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            resolved: None,
            references: 0,
            dry_run: false,
        }
    }

    /// Log commands instead of executing them.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn references(&self) -> usize {
        self.references
    }

    fn resolve(&self) -> Result<PathBuf> {
        which(&self.binary)
            .map_err(|e| SysError::ResourceAcquire(format!("{} not found: {e}", self.binary)))
    }
}

impl CommandRunner for SystemCommandRunner {
    fn acquire(&mut self) -> Result<()> {
        if self.references == 0 && !self.dry_run {
            let path = self.resolve()?;
            info!("Using lvm binary at {:?}", path);
            self.resolved = Some(path);
        }
        self.references += 1;
        debug!("Command runner references: {}", self.references);
        Ok(())
    }

    fn release(&mut self) {
        self.references = self.references.saturating_sub(1);
        if self.references == 0 {
            self.resolved = None;
        }
        debug!("Command runner references: {}", self.references);
    }

    fn run(&mut self, command: &LvmCommand) -> Result<()> {
        if self.dry_run {
            info!("Dry run, not executing: {} {}", self.binary, command);
            return Ok(());
        }

        let Some(binary) = self.resolved.as_ref() else {
            return Err(SysError::ResourceAcquire(format!(
                "{} has not been acquired",
                self.binary
            )));
        };

        debug!("Executing: {} {}", self.binary, command);
        let output = Command::new(binary).args(command.args()).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SysError::CommandExec {
                command: command.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DEFAULT_COMMAND_BUFFER_SIZE, LvmAction};

    #[test]
    fn dry_run_counts_references_without_binary() {
        let mut runner = SystemCommandRunner::new("lvm-does-not-exist").dry_run(true);
        runner.acquire().unwrap();
        runner.acquire().unwrap();
        assert_eq!(runner.references(), 2);

        let command =
            LvmCommand::build(LvmAction::Rescan, "vg/lv", DEFAULT_COMMAND_BUFFER_SIZE).unwrap();
        assert!(runner.run(&command).is_ok());

        runner.release();
        runner.release();
        runner.release();
        assert_eq!(runner.references(), 0);
    }

    #[test]
    fn acquire_fails_when_binary_is_missing() {
        let mut runner = SystemCommandRunner::new("lvm-does-not-exist-anywhere");
        let err = runner.acquire().unwrap_err();
        assert!(matches!(err, SysError::ResourceAcquire(_)));
        assert_eq!(runner.references(), 0);
    }

    #[test]
    fn run_without_acquire_is_refused() {
        let mut runner = SystemCommandRunner::new("lvm");
        let command =
            LvmCommand::build(LvmAction::Repair, "vg/lv", DEFAULT_COMMAND_BUFFER_SIZE).unwrap();
        assert!(matches!(
            runner.run(&command),
            Err(SysError::ResourceAcquire(_))
        ));
    }
}
