//! Monitored device identity and session state

use serde::{Deserialize, Serialize};

/// A device as handed over by the event host.
///
/// Only `name` is interpreted; `uuid`, `major` and `minor` are carried along
/// for logging and for the host's own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// External device name (device-mapper name or `vg/lv`)
    pub name: String,

    /// Device-mapper UUID
    pub uuid: String,

    pub major: u32,
    pub minor: u32,
}

impl DeviceIdentity {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>, major: u32, minor: u32) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            major,
            minor,
        }
    }

    /// Identity known only by name, as used by the CLI front end.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, String::new(), 0, 0)
    }
}

/// Monitoring state of one device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitoringSession {
    #[default]
    Unregistered,
    Registered,
}

impl MonitoringSession {
    pub fn is_registered(&self) -> bool {
        matches!(self, MonitoringSession::Registered)
    }
}

/// Split at the first unescaped '-', turning "--" back into '-'.
fn split_unquoted(input: &str) -> (String, Option<&str>) {
    let mut unquoted = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c != '-' {
            unquoted.push(c);
            continue;
        }
        if let Some((_, '-')) = chars.peek() {
            chars.next();
            unquoted.push('-');
            continue;
        }
        return (unquoted, Some(&input[idx + 1..]));
    }

    (unquoted, None)
}

/// Translate a device-mapper name into the `vg/lv` path LVM tools expect.
///
/// `my--vg-data` becomes `my-vg/data`; a trailing layer such as `-real` is
/// dropped. Returns `None` for names that already look like a path or that
/// do not contain both a VG and an LV part.
pub fn lv_path_from_dm_name(dm_name: &str) -> Option<String> {
    if dm_name.contains('/') {
        return None;
    }

    let (vg, rest) = split_unquoted(dm_name);
    let (lv, _layer) = split_unquoted(rest?);

    if vg.is_empty() || lv.is_empty() {
        return None;
    }

    Some(format!("{vg}/{lv}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_plain_dm_name() {
        assert_eq!(lv_path_from_dm_name("vg-lv").as_deref(), Some("vg/lv"));
    }

    #[test]
    fn unescapes_doubled_dashes() {
        assert_eq!(
            lv_path_from_dm_name("my--vg-raid--lv").as_deref(),
            Some("my-vg/raid-lv")
        );
    }

    #[test]
    fn drops_layer_suffix() {
        assert_eq!(lv_path_from_dm_name("vg-lv-real").as_deref(), Some("vg/lv"));
        assert_eq!(
            lv_path_from_dm_name("vg-lv_rimage_0").as_deref(),
            Some("vg/lv_rimage_0")
        );
    }

    #[test]
    fn leaves_paths_and_unsplittable_names_alone() {
        assert_eq!(lv_path_from_dm_name("vg/lv"), None);
        assert_eq!(lv_path_from_dm_name("nodash"), None);
        assert_eq!(lv_path_from_dm_name("-lv"), None);
        assert_eq!(lv_path_from_dm_name("vg-"), None);
    }

    #[test]
    fn session_defaults_to_unregistered() {
        assert!(!MonitoringSession::default().is_registered());
        assert!(MonitoringSession::Registered.is_registered());
    }
}
