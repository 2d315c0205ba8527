// SPDX-License-Identifier: GPL-3.0-only

//! Event-host entry points

use std::sync::{Arc, Mutex};

use raid_sys::{CommandRunner, DmTask};
use raid_types::{DeviceIdentity, EventMask};

use crate::config::MonitorConfig;
use crate::dispatch::{EventDispatcher, EventReport, SharedRunner};
use crate::lifecycle::MonitorLifecycle;
use crate::parser::StatusParser;
use crate::repair::RepairInvoker;

/// The three calls an event host makes: register, process, unregister.
///
/// Safe to share across the host's worker threads.
pub struct RaidMonitor<R> {
    runner: SharedRunner<R>,
    lifecycle: MonitorLifecycle<R>,
    dispatcher: EventDispatcher<R>,
}

impl<R: CommandRunner> RaidMonitor<R> {
    pub fn new(runner: R, config: &MonitorConfig) -> Self {
        let runner = Arc::new(Mutex::new(runner));
        let dispatcher = EventDispatcher::new(
            runner.clone(),
            StatusParser::new(config.strict_token_count),
            RepairInvoker::new(config.command_buffer_size, config.translate_dm_names),
            config.raid_target_type.clone(),
        );

        Self {
            lifecycle: MonitorLifecycle::new(runner.clone()),
            dispatcher,
            runner,
        }
    }

    pub fn register_device(&self, device: &str, uuid: &str, major: u32, minor: u32) -> bool {
        self.lifecycle
            .register_device(&DeviceIdentity::new(device, uuid, major, minor))
    }

    pub fn unregister_device(&self, device: &str, uuid: &str, major: u32, minor: u32) -> bool {
        self.lifecycle
            .unregister_device(&DeviceIdentity::new(device, uuid, major, minor))
    }

    pub fn process_event(&self, task: &dyn DmTask, mask: EventMask) -> EventReport {
        self.dispatcher.process_event(task, mask)
    }

    pub fn lifecycle(&self) -> &MonitorLifecycle<R> {
        &self.lifecycle
    }

    pub fn runner(&self) -> &SharedRunner<R> {
        &self.runner
    }
}
