//! RAID status types
//!
//! Types describing one decoded `raid` target status line and the verdict
//! reached after inspecting it.

use serde::{Deserialize, Serialize};

/// One decoded `raid` status line.
///
/// `<raid_type> <#devices> <health_chars> <resync_numerator>/<resync_denominator>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidStatusRecord {
    /// RAID layout token (e.g. "raid1", "raid5_ls")
    pub raid_type: String,

    /// Number of member devices, always at least 1
    pub device_count: usize,

    /// One health character per member device
    ///
    /// The length is not validated at parse time.
    pub health: String,

    /// Resync numerator, kept as raw text
    pub resync_numerator: String,

    /// Resync denominator, kept as raw text
    pub resync_denominator: String,
}

impl RaidStatusRecord {
    /// Whether the resync ratio reads as complete.
    ///
    /// This is a textual comparison: "04/4" is not in sync.
    pub fn resync_complete(&self) -> bool {
        self.resync_numerator == self.resync_denominator
    }
}

/// Per-device health code reported by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    /// 'A': alive and in sync
    Alive,
    /// 'a': alive but not yet in sync
    Syncing,
    /// 'D': dead/failed
    Dead,
    /// Any code this monitor does not know about
    Unknown(char),
}

impl From<char> for HealthState {
    fn from(c: char) -> Self {
        match c {
            'A' => HealthState::Alive,
            'a' => HealthState::Syncing,
            'D' => HealthState::Dead,
            other => HealthState::Unknown(other),
        }
    }
}

/// Outcome of evaluating one `RaidStatusRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthVerdict {
    /// A member device failed; `index` is the first failed slot.
    NeedsRepair { index: usize },
    /// No failure; the flag tells whether the resync ratio is complete.
    InSync(bool),
}

impl HealthVerdict {
    pub fn needs_repair(&self) -> bool {
        matches!(self, HealthVerdict::NeedsRepair { .. })
    }
}
