// SPDX-License-Identifier: GPL-3.0-only

//! `raid` target status line parser
//!
//! `<raid_type> <#raid_disks> <health_chars> <resync_numerator>/<resync_denominator>`

use raid_types::RaidStatusRecord;
use tracing::error;

use crate::error::{MonitorError, ParseError, Result};

const STATUS_FIELDS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct StatusParser {
    strict_token_count: bool,
}

impl Default for StatusParser {
    fn default() -> Self {
        Self {
            strict_token_count: true,
        }
    }
}

impl StatusParser {
    /// With `strict_token_count` off, fields after the fourth (sync action,
    /// mismatch count, ... on newer kernels) are ignored instead of rejected.
    pub fn new(strict_token_count: bool) -> Self {
        Self { strict_token_count }
    }

    pub fn parse(&self, line: &str, device: &str) -> Result<RaidStatusRecord> {
        self.parse_fields(line).map_err(|source| {
            match &source {
                ParseError::TokenCount { .. } => {
                    error!("Failed to process status line for {device}.")
                }
                ParseError::BadCount { value } => {
                    error!("Failed to parse number of devices for {device}: {value}.")
                }
                ParseError::MissingSeparator { value } => {
                    error!("Failed to parse resync_ratio for {device}: {value}.")
                }
            }
            MonitorError::Parse {
                device: device.to_string(),
                source,
            }
        })
    }

    fn parse_fields(&self, line: &str) -> std::result::Result<RaidStatusRecord, ParseError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let enough = if self.strict_token_count {
            words.len() == STATUS_FIELDS
        } else {
            words.len() >= STATUS_FIELDS
        };
        if !enough {
            return Err(ParseError::TokenCount { found: words.len() });
        }

        let (raid_type, count, health, ratio) = (words[0], words[1], words[2], words[3]);

        let device_count = match count.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ParseError::BadCount {
                    value: count.to_string(),
                });
            }
        };

        let Some((numerator, denominator)) = ratio.split_once('/') else {
            return Err(ParseError::MissingSeparator {
                value: ratio.to_string(),
            });
        };

        Ok(RaidStatusRecord {
            raid_type: raid_type.to_string(),
            device_count,
            health: health.to_string(),
            resync_numerator: numerator.to_string(),
            resync_denominator: denominator.to_string(),
        })
    }
}

/// Parse with the default, strict, parser.
pub fn parse_status_line(line: &str, device: &str) -> Result<RaidStatusRecord> {
    StatusParser::default().parse(line, device)
}
