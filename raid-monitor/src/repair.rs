// SPDX-License-Identifier: GPL-3.0-only

//! Rescan-then-repair workflow

use raid_sys::{CommandRunner, LvmAction, LvmCommand};
use raid_types::{RepairOutcome, lv_path_from_dm_name};
use tracing::{debug, info};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct RepairInvoker {
    buffer_size: usize,
    translate_dm_names: bool,
}

impl RepairInvoker {
    pub fn new(buffer_size: usize, translate_dm_names: bool) -> Self {
        Self {
            buffer_size,
            translate_dm_names,
        }
    }

    /// Name handed to LVM for `device`.
    pub fn lvm_target(&self, device: &str) -> String {
        if self.translate_dm_names
            && let Some(path) = lv_path_from_dm_name(device)
        {
            return path;
        }
        device.to_string()
    }

    /// Run `lvscan --cache` then `lvconvert --repair` for `device`.
    ///
    /// A command that cannot be composed aborts the workflow with an error.
    /// A failed rescan is logged and the repair still runs; the repair
    /// result alone decides `RepairOutcome::succeeded`.
    pub fn repair<R>(&self, runner: &mut R, device: &str) -> Result<RepairOutcome>
    where
        R: CommandRunner + ?Sized,
    {
        let target = self.lvm_target(device);

        let rescan = LvmCommand::build(LvmAction::Rescan, &target, self.buffer_size)?;
        let rescan_succeeded = self.execute(runner, &rescan);
        if !rescan_succeeded {
            info!("Re-scan of RAID device {device} failed.");
        }

        let repair = LvmCommand::build(LvmAction::Repair, &target, self.buffer_size)?;
        let repair_succeeded = self.execute(runner, &repair);
        if !repair_succeeded {
            info!("Repair of RAID device {device} failed.");
        }

        Ok(RepairOutcome {
            rescan_succeeded,
            repair_succeeded,
        })
    }

    fn execute<R>(&self, runner: &mut R, command: &LvmCommand) -> bool
    where
        R: CommandRunner + ?Sized,
    {
        match runner.run(command) {
            Ok(()) => true,
            Err(e) => {
                debug!("{} step failed: {e}", command.action());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use raid_sys::{DEFAULT_COMMAND_BUFFER_SIZE, SysError};

    #[derive(Default)]
    struct ScriptedRunner {
        commands: Vec<String>,
        fail: Vec<LvmAction>,
    }

    impl CommandRunner for ScriptedRunner {
        fn acquire(&mut self) -> raid_sys::Result<()> {
            Ok(())
        }

        fn release(&mut self) {}

        fn run(&mut self, command: &LvmCommand) -> raid_sys::Result<()> {
            self.commands.push(command.to_string());
            if self.fail.contains(&command.action()) {
                return Err(SysError::CommandExec {
                    command: command.to_string(),
                    stderr: "scripted failure".to_string(),
                });
            }
            Ok(())
        }
    }

    fn invoker() -> RepairInvoker {
        RepairInvoker::new(DEFAULT_COMMAND_BUFFER_SIZE, true)
    }

    #[test]
    fn runs_rescan_then_repair() {
        let mut runner = ScriptedRunner::default();
        let outcome = invoker().repair(&mut runner, "vg/lv").unwrap();

        assert!(outcome.succeeded());
        assert_eq!(
            runner.commands,
            vec![
                "lvscan --cache vg/lv".to_string(),
                "lvconvert --config devices{ignore_suspended_devices=1} --repair --use-policies vg/lv"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn failed_rescan_does_not_gate_repair() {
        let mut runner = ScriptedRunner {
            fail: vec![LvmAction::Rescan],
            ..ScriptedRunner::default()
        };
        let outcome = invoker().repair(&mut runner, "vg/lv").unwrap();

        assert_eq!(runner.commands.len(), 2);
        assert!(!outcome.rescan_succeeded);
        assert!(outcome.succeeded());
    }

    #[test]
    fn failed_repair_fails_workflow() {
        let mut runner = ScriptedRunner {
            fail: vec![LvmAction::Repair],
            ..ScriptedRunner::default()
        };
        let outcome = invoker().repair(&mut runner, "vg/lv").unwrap();

        assert!(outcome.rescan_succeeded);
        assert!(!outcome.succeeded());
    }

    #[test]
    fn oversized_device_name_aborts_before_running() {
        let mut runner = ScriptedRunner::default();
        let device = format!("vg/{}", "x".repeat(300));
        let err = invoker().repair(&mut runner, &device).unwrap_err();

        assert!(matches!(
            err,
            MonitorError::Sys(SysError::CommandBuild { .. })
        ));
        assert!(runner.commands.is_empty());
    }

    #[test]
    fn repair_build_failure_aborts_after_rescan() {
        // Fits the rescan template but not the longer repair template.
        let mut runner = ScriptedRunner::default();
        let device = format!("vg/{}", "x".repeat(200));
        let err = invoker().repair(&mut runner, &device).unwrap_err();

        assert!(matches!(
            err,
            MonitorError::Sys(SysError::CommandBuild { .. })
        ));
        assert_eq!(runner.commands.len(), 1);
    }

    #[test]
    fn translates_dm_names_when_enabled() {
        assert_eq!(invoker().lvm_target("vg-lv"), "vg/lv");
        assert_eq!(invoker().lvm_target("vg/lv"), "vg/lv");
        assert_eq!(
            RepairInvoker::new(DEFAULT_COMMAND_BUFFER_SIZE, false).lvm_target("vg-lv"),
            "vg-lv"
        );
    }
}
