// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_PREFIX: &str = "raid-monitor.log";
const KEEP_DAYS: u64 = 7;

/// Install the global subscriber: stderr always, a daily file when enabled.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) {
    let env_filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "warn,raid_monitor={level},raid_sys={level}",
                level = config.level.as_directive()
            ))
        })
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter());

    if !config.log_to_disk {
        tracing_subscriber::registry().with(stderr_layer).init();
        return;
    }

    match file_writer(config) {
        Ok((writer, guard)) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_filter(env_filter());

            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();

            // Keep the background logging worker alive for the duration of the process.
            let _ = LOG_GUARD.set(guard);
        }
        Err(e) => {
            eprintln!("raid-monitor: failed to initialize file logging: {e:#}");
            tracing_subscriber::registry().with(stderr_layer).init();
        }
    }
}

fn file_writer(
    config: &LoggingConfig,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = resolve_log_dir(config);
    let prefix = OsString::from(LOG_PREFIX);

    fs::create_dir_all(&dir).map_err(|e| {
        anyhow::anyhow!("create log directory failed: {} ({})", dir.display(), e)
    })?;

    cleanup_old_logs(&dir, &prefix);

    let appender = tracing_appender::rolling::daily(&dir, &prefix);
    Ok(tracing_appender::non_blocking(appender))
}

fn resolve_log_dir(config: &LoggingConfig) -> PathBuf {
    if let Some(dir) = &config.log_dir {
        return dir.clone();
    }

    if let Some(dir) = std::env::var_os("RAID_MONITOR_LOG_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(xdg_state) = std::env::var_os("XDG_STATE_HOME") {
        return PathBuf::from(xdg_state).join("raid-monitor").join("logs");
    }

    PathBuf::from("/var/log/raid-monitor")
}

fn cleanup_old_logs(dir: &Path, prefix: &OsString) {
    let cutoff = SystemTime::now().checked_sub(Duration::from_secs(KEEP_DAYS * 24 * 60 * 60));
    let Some(cutoff) = cutoff else { return };

    let prefix = prefix.to_string_lossy();

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        // Only touch files created by our rolling appender.
        if !entry.file_name().to_string_lossy().starts_with(prefix.as_ref()) {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if modified >= cutoff {
            continue;
        }

        let _ = fs::remove_file(entry.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_takes_precedence() {
        let config = LoggingConfig {
            log_dir: Some(PathBuf::from("/tmp/raid-monitor-test-logs")),
            ..LoggingConfig::default()
        };
        assert_eq!(
            resolve_log_dir(&config),
            PathBuf::from("/tmp/raid-monitor-test-logs")
        );
    }

    #[test]
    fn cleanup_keeps_fresh_and_foreign_files() {
        let dir = std::env::temp_dir().join(format!("raid-monitor-logs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let ours = dir.join("raid-monitor.log.2026-10-19");
        let foreign = dir.join("other.log");
        fs::write(&ours, b"fresh").unwrap();
        fs::write(&foreign, b"keep").unwrap();

        cleanup_old_logs(&dir, &OsString::from(LOG_PREFIX));

        assert!(ours.exists());
        assert!(foreign.exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
