use serde::{Deserialize, Serialize};

/// Result of one rescan-then-repair workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairOutcome {
    /// `lvscan --cache` reported success; informational only
    pub rescan_succeeded: bool,

    /// `lvconvert --repair` reported success; decides the outcome
    pub repair_succeeded: bool,
}

impl RepairOutcome {
    pub fn succeeded(&self) -> bool {
        self.repair_succeeded
    }
}
