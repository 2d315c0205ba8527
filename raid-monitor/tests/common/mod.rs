#![allow(dead_code)]

use raid_monitor::{MonitorConfig, RaidMonitor};
use raid_sys::{CommandRunner, LvmAction, LvmCommand, StatusTask, SysError};
use raid_types::TargetRecord;

/// Records every command instead of running it.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub commands: Vec<String>,
    pub fail: Vec<LvmAction>,
    pub acquired: usize,
    pub released: usize,
    pub unavailable: bool,
}

impl CommandRunner for RecordingRunner {
    fn acquire(&mut self) -> raid_sys::Result<()> {
        if self.unavailable {
            return Err(SysError::ResourceAcquire("lvm missing".to_string()));
        }
        self.acquired += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.released += 1;
    }

    fn run(&mut self, command: &LvmCommand) -> raid_sys::Result<()> {
        self.commands.push(command.to_string());
        if self.fail.contains(&command.action()) {
            return Err(SysError::CommandExec {
                command: command.to_string(),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

pub fn monitor() -> RaidMonitor<RecordingRunner> {
    RaidMonitor::new(RecordingRunner::default(), &MonitorConfig::default())
}

pub fn monitor_with(runner: RecordingRunner) -> RaidMonitor<RecordingRunner> {
    RaidMonitor::new(runner, &MonitorConfig::default())
}

/// A single-target raid event for `device`.
pub fn raid_task(device: &str, params: &str) -> StatusTask {
    StatusTask::new(device, vec![TargetRecord::new(0, 2048, "raid", params)])
}

pub fn commands(monitor: &RaidMonitor<RecordingRunner>) -> Vec<String> {
    monitor.runner().lock().unwrap().commands.clone()
}
