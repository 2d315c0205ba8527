// SPDX-License-Identifier: GPL-3.0-only

//! raid-monitor - watch device-mapper RAID volumes and repair failed devices

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use raid_monitor::{EventReport, MonitorConfig, RaidMonitor, StatusParser, evaluate, logging};
use raid_sys::{Dmsetup, SystemCommandRunner};
use raid_types::EventType;
use tokio::task::JoinSet;

#[derive(Debug, Parser)]
#[command(name = "raid-monitor")]
#[command(about = "Monitor device-mapper RAID volumes and repair failed devices")]
struct Args {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log repair commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process one event for a device from its current table status
    Check { device: String },

    /// Parse and evaluate a raid status line without repairing anything
    Parse {
        /// Device name used in log messages
        #[arg(long, default_value = "-")]
        device: String,

        #[arg(required = true, num_args = 1..)]
        line: Vec<String>,
    },

    /// Poll devices and repair them until interrupted
    Watch {
        #[arg(required = true)]
        devices: Vec<String>,

        /// Seconds between polls
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = MonitorConfig::load(args.config.as_deref()).context("loading configuration")?;
    logging::init(&config.logging);

    tracing::debug!("raid-monitor v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Check { device } => check(&config, args.dry_run, &device),
        Command::Parse { device, line } => parse(&config, &device, &line.join(" ")),
        Command::Watch { devices, interval } => {
            watch(&config, args.dry_run, devices, Duration::from_secs(interval.max(1))).await
        }
    }
}

fn build_monitor(config: &MonitorConfig, dry_run: bool) -> RaidMonitor<SystemCommandRunner> {
    let runner = SystemCommandRunner::new(config.lvm_binary.clone()).dry_run(dry_run);
    RaidMonitor::new(runner, config)
}

fn check(config: &MonitorConfig, dry_run: bool, device: &str) -> Result<()> {
    let monitor = build_monitor(config, dry_run);
    let dmsetup = Dmsetup::new(&config.dmsetup_binary)?;

    if !monitor.register_device(device, "", 0, 0) {
        anyhow::bail!("cannot monitor {device}: lvm is not available");
    }

    let report = dmsetup
        .status(device)
        .map(|task| monitor.process_event(&task, EventType::Single.into()));
    monitor.unregister_device(device, "", 0, 0);

    println!("{}", serde_json::to_string_pretty(&report?)?);
    Ok(())
}

fn parse(config: &MonitorConfig, device: &str, line: &str) -> Result<()> {
    let record = StatusParser::new(config.strict_token_count).parse(line, device)?;
    let verdict = evaluate(&record, device)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "record": record,
            "verdict": verdict,
        }))?
    );
    Ok(())
}

async fn watch(
    config: &MonitorConfig,
    dry_run: bool,
    devices: Vec<String>,
    interval: Duration,
) -> Result<()> {
    let monitor = Arc::new(build_monitor(config, dry_run));
    let dmsetup = Arc::new(Dmsetup::new(&config.dmsetup_binary)?);

    let registered: Vec<String> = devices
        .into_iter()
        .filter(|device| monitor.register_device(device, "", 0, 0))
        .collect();
    if registered.is_empty() {
        anyhow::bail!("no device could be registered for monitoring");
    }

    run_until_shutdown(tokio::signal::ctrl_c(), interval, || {
        poll_once(&monitor, &dmsetup, &registered)
    })
    .await;
    tracing::info!("Received shutdown signal");

    for device in &registered {
        monitor.unregister_device(device, "", 0, 0);
    }
    Ok(())
}

/// Call `poll` on every tick until `shutdown` resolves.
///
/// `shutdown` is created once and polled first on every iteration, so a
/// signal raised while `poll` runs ends the loop right after it.
async fn run_until_shutdown<S, P, F>(shutdown: S, interval: Duration, mut poll: P)
where
    S: Future,
    P: FnMut() -> F,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => poll().await,
        }
    }
}

async fn poll_once(
    monitor: &Arc<RaidMonitor<SystemCommandRunner>>,
    dmsetup: &Arc<Dmsetup>,
    devices: &[String],
) {
    let mut events = JoinSet::new();

    for device in devices {
        let monitor = Arc::clone(monitor);
        let dmsetup = Arc::clone(dmsetup);
        let device = device.clone();
        events.spawn_blocking(move || -> (String, raid_sys::Result<EventReport>) {
            let report = dmsetup
                .status(&device)
                .map(|task| monitor.process_event(&task, EventType::Single.into()));
            (device, report)
        });
    }

    while let Some(joined) = events.join_next().await {
        match joined {
            Ok((device, Ok(report))) => tracing::debug!(
                "{device}: {} target(s), {} repair(s)",
                report.targets.len(),
                report.repairs_attempted()
            ),
            Ok((device, Err(e))) => tracing::warn!("Status query for {device} failed: {e}"),
            Err(e) => tracing::error!("Event task failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn shutdown_raised_during_a_poll_stops_the_loop() {
        let (tx, rx) = oneshot::channel::<()>();
        let mut tx = Some(tx);
        let mut polls = 0;

        run_until_shutdown(rx, Duration::from_millis(1), || {
            polls += 1;
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
            std::future::ready(())
        })
        .await;

        assert_eq!(polls, 1);
    }

    #[tokio::test]
    async fn pending_shutdown_wins_over_the_first_tick() {
        let mut polls = 0;

        run_until_shutdown(std::future::ready(()), Duration::from_millis(1), || {
            polls += 1;
            std::future::ready(())
        })
        .await;

        assert_eq!(polls, 0);
    }
}
