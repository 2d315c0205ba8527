// SPDX-License-Identifier: GPL-3.0-only

//! Device registration and the shared command resource

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use raid_sys::CommandRunner;
use raid_types::{DeviceIdentity, MonitoringSession};
use tracing::{error, info, warn};

use crate::dispatch::SharedRunner;

pub struct MonitorLifecycle<R> {
    runner: SharedRunner<R>,
    sessions: Mutex<HashMap<String, MonitoringSession>>,
}

impl<R: CommandRunner> MonitorLifecycle<R> {
    pub fn new(runner: SharedRunner<R>) -> Self {
        Self {
            runner,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start monitoring `device`.
    ///
    /// Returns `false` when the shared command resource cannot be acquired;
    /// the device then stays unregistered.
    pub fn register_device(&self, device: &DeviceIdentity) -> bool {
        let acquired = self
            .runner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .acquire();

        if let Err(e) = acquired {
            error!("Cannot monitor RAID device {}: {e}", device.name);
            return false;
        }

        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(device.name.clone(), MonitoringSession::Registered);

        info!("Monitoring RAID device {} for events.", device.name);
        true
    }

    /// Stop monitoring `device` and release the shared resource. Always
    /// succeeds.
    pub fn unregister_device(&self, device: &DeviceIdentity) -> bool {
        let previous = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&device.name);

        if previous.is_none() {
            warn!("{} was not registered", device.name);
        }

        info!("No longer monitoring RAID device {} for events.", device.name);
        self.runner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .release();

        true
    }

    pub fn session(&self, device: &str) -> MonitoringSession {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_monitored(&self, device: &str) -> bool {
        self.session(device).is_registered()
    }

    pub fn monitored_devices(&self) -> Vec<String> {
        let mut devices: Vec<String> = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        devices.sort();
        devices
    }
}
