// SPDX-License-Identifier: GPL-3.0-only

//! Per-event dispatch over the target records of one device

use std::sync::{Arc, Mutex, PoisonError};

use raid_sys::{CommandRunner, DmTask};
use raid_types::{EventMask, HealthVerdict, RepairOutcome, TargetRecord};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::health;
use crate::parser::StatusParser;
use crate::repair::RepairInvoker;

/// Command runner shared by every monitored device.
///
/// The lock is process-wide, not per device: one event's dispatch, including
/// any blocking repair, holds it to completion, so events for other devices
/// wait behind it.
pub type SharedRunner<R> = Arc<Mutex<R>>;

/// What happened to one target record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TargetOutcome {
    MappingLost,
    NonRaid { target_type: String },
    Healthy { in_sync: bool },
    Repaired { failed_index: usize, repair: RepairOutcome },
    RepairFailed { failed_index: usize, repair: RepairOutcome },
    Failed { reason: String },
}

/// Per-target outcomes of one event, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventReport {
    pub device: String,
    pub targets: Vec<TargetOutcome>,
}

impl EventReport {
    pub fn repairs_attempted(&self) -> usize {
        self.targets
            .iter()
            .filter(|outcome| {
                matches!(
                    outcome,
                    TargetOutcome::Repaired { .. } | TargetOutcome::RepairFailed { .. }
                )
            })
            .count()
    }
}

pub struct EventDispatcher<R> {
    runner: SharedRunner<R>,
    parser: StatusParser,
    invoker: RepairInvoker,
    raid_target_type: String,
}

impl<R: CommandRunner> EventDispatcher<R> {
    pub fn new(
        runner: SharedRunner<R>,
        parser: StatusParser,
        invoker: RepairInvoker,
        raid_target_type: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            parser,
            invoker,
            raid_target_type: raid_target_type.into(),
        }
    }

    /// Handle one kernel event.
    ///
    /// Every target is processed, in order, under the shared runner lock.
    /// A task without targets is handled as a single lost mapping.
    /// Failures are logged and recorded in the report; nothing is returned
    /// to the caller as an error.
    pub fn process_event(&self, task: &dyn DmTask, mask: EventMask) -> EventReport {
        let device = task.name();
        debug!("Event {:?} for {device}", mask);

        let lost = [TargetRecord::lost()];
        let records = match task.targets() {
            [] => &lost[..],
            targets => targets,
        };

        let mut runner = self.runner.lock().unwrap_or_else(PoisonError::into_inner);

        let targets = records
            .iter()
            .map(|target| self.process_target(&mut *runner, target, device))
            .collect();

        EventReport {
            device: device.to_string(),
            targets,
        }
    }

    fn process_target(&self, runner: &mut R, target: &TargetRecord, device: &str) -> TargetOutcome {
        let Some(target_type) = target.target_type.as_deref() else {
            info!("{device} mapping lost.");
            return TargetOutcome::MappingLost;
        };

        if target_type != self.raid_target_type {
            info!("{device} has non-raid portion.");
            return TargetOutcome::NonRaid {
                target_type: target_type.to_string(),
            };
        }

        match self.process_raid_status(runner, &target.params, device) {
            Ok(outcome) => {
                if matches!(outcome, TargetOutcome::RepairFailed { .. }) {
                    error!("Failed to process event for {device}.");
                }
                outcome
            }
            Err(e) => {
                debug!("{e}");
                error!("Failed to process event for {device}.");
                TargetOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn process_raid_status(&self, runner: &mut R, params: &str, device: &str) -> Result<TargetOutcome> {
        let record = self.parser.parse(params, device)?;

        match health::evaluate(&record, device)? {
            HealthVerdict::InSync(in_sync) => Ok(TargetOutcome::Healthy { in_sync }),
            HealthVerdict::NeedsRepair { index } => {
                let repair = self.invoker.repair(runner, device)?;
                if repair.succeeded() {
                    Ok(TargetOutcome::Repaired {
                        failed_index: index,
                        repair,
                    })
                } else {
                    Ok(TargetOutcome::RepairFailed {
                        failed_index: index,
                        repair,
                    })
                }
            }
        }
    }
}
