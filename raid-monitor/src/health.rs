// SPDX-License-Identifier: GPL-3.0-only

//! Array health classification

use raid_types::{HealthState, HealthVerdict, RaidStatusRecord};
use tracing::{debug, error, info};

use crate::error::{MonitorError, Result};

/// Classify one parsed status record.
///
/// The scan stops at the first failed device: repair works on the whole
/// array, so later failures are picked up by the next event. A health
/// string shorter than the device count is only an error once the scan
/// runs off its end without having found a failure.
pub fn evaluate(record: &RaidStatusRecord, device: &str) -> Result<HealthVerdict> {
    let mut codes = record.health.chars();

    for index in 0..record.device_count {
        let Some(c) = codes.next() else {
            return Err(MonitorError::HealthBounds {
                device: device.to_string(),
                expected: record.device_count,
                found: index,
            });
        };

        match HealthState::from(c) {
            HealthState::Alive | HealthState::Syncing => {}
            HealthState::Dead => {
                error!(
                    "Device #{index} of {} array, {device}, has failed.",
                    record.raid_type
                );
                return Ok(HealthVerdict::NeedsRepair { index });
            }
            HealthState::Unknown(code) => {
                debug!("Unhandled health character {code:?} for device #{index} of {device}");
            }
        }
    }

    let in_sync = record.resync_complete();
    info!(
        "{} array, {device}, is {} in-sync.",
        record.raid_type,
        if in_sync { "now" } else { "not" }
    );

    Ok(HealthVerdict::InSync(in_sync))
}
