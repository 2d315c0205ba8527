//! Device-mapper target and event types

use enumflags2::{BitFlags, bitflags};
use serde::{Deserialize, Serialize};

/// Target type name of the device-mapper RAID target.
pub const RAID_TARGET_TYPE: &str = "raid";

/// One line of a device-mapper table status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// First sector covered by this target
    pub start: u64,

    /// Number of sectors covered by this target
    pub length: u64,

    /// Target type (e.g. "raid", "linear"); `None` when the mapping is gone
    pub target_type: Option<String>,

    /// Target-specific status parameters
    pub params: String,
}

impl TargetRecord {
    pub fn new(start: u64, length: u64, target_type: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            start,
            length,
            target_type: Some(target_type.into()),
            params: params.into(),
        }
    }

    /// A record whose mapping was lost between the event and the status query.
    pub fn lost() -> Self {
        Self {
            start: 0,
            length: 0,
            target_type: None,
            params: String::new(),
        }
    }

    pub fn is_type(&self, target_type: &str) -> bool {
        self.target_type.as_deref() == Some(target_type)
    }
}

/// Device-mapper event kinds, bit-compatible with libdevmapper-event.
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Single = 0x01,
    Multi = 0x02,
    SectorError = 0x100,
    DeviceError = 0x200,
    PathError = 0x400,
    AdaptorError = 0x800,
    SyncStatus = 0x1000,
    Timeout = 0x10000,
    RegistrationPending = 0x100_0000,
}

pub type EventMask = BitFlags<EventType>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_kernel_bit_values() {
        let mask = EventMask::from_bits_truncate(0x200 | 0x1000 | 0x4);
        assert!(mask.contains(EventType::DeviceError));
        assert!(mask.contains(EventType::SyncStatus));
        assert_eq!(mask.bits(), 0x1200);
    }

    #[test]
    fn lost_record_has_no_type() {
        let record = TargetRecord::lost();
        assert!(record.target_type.is_none());
        assert!(!record.is_type(RAID_TARGET_TYPE));
        assert!(TargetRecord::new(0, 8, "raid", "").is_type(RAID_TARGET_TYPE));
    }
}
