use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dm::shutdown::StopTimings;

/// Controller config (YAML).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlConfig {
    /// Where the daemon's pid record lives. Parent directories are created on write.
    pub pidpath: PathBuf,

    /// Executable to launch as the daemon.
    pub command: String,

    /// Arguments passed to the daemon executable.
    #[serde(default)]
    pub args: Vec<String>,

    /// Daemon stdout redirect file, truncated on every spawn.
    #[serde(default = "default_stdout_path")]
    pub stdout_path: PathBuf,

    /// Daemon stderr redirect file, truncated on every spawn.
    #[serde(default = "default_stderr_path")]
    pub stderr_path: PathBuf,

    /// Liveness re-check cadence while stopping.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long after the interrupt to escalate to SIGKILL.
    #[serde(default = "default_force_kill_after_ms")]
    pub force_kill_after_ms: u64,

    /// How long after the interrupt to give up on the stop entirely.
    /// The default leaves only 500ms between SIGKILL and giving up; widen it
    /// on systems that reap slowly.
    #[serde(default = "default_give_up_after_ms")]
    pub give_up_after_ms: u64,
}

fn default_stdout_path() -> PathBuf {
    PathBuf::from("stdout.out")
}

fn default_stderr_path() -> PathBuf {
    PathBuf::from("stderr.out")
}

// The single source for the stock timings is StopTimings::default().
fn default_poll_interval_ms() -> u64 {
    StopTimings::default().poll_interval.as_millis() as u64
}

fn default_force_kill_after_ms() -> u64 {
    StopTimings::default().force_kill_after.as_millis() as u64
}

fn default_give_up_after_ms() -> u64 {
    StopTimings::default().give_up_after.as_millis() as u64
}

impl ControlConfig {
    pub fn stop_timings(&self) -> StopTimings {
        StopTimings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            force_kill_after: Duration::from_millis(self.force_kill_after_ms),
            give_up_after: Duration::from_millis(self.give_up_after_ms),
        }
    }

    /// A give-up deadline before the force-kill deadline would time the stop
    /// out without ever sending SIGKILL; a zero poll interval cannot tick.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.poll_interval_ms > 0, "poll_interval_ms must be > 0");
        anyhow::ensure!(
            self.give_up_after_ms >= self.force_kill_after_ms,
            "give_up_after_ms ({}) must be >= force_kill_after_ms ({})",
            self.give_up_after_ms,
            self.force_kill_after_ms
        );
        Ok(())
    }
}

pub fn load_control_config(config_path: &Path) -> anyhow::Result<ControlConfig> {
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", config_path.display()))?;
    let cfg: ControlConfig = serde_yaml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse config {}: {e}", config_path.display()))?;
    cfg.validate()
        .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", config_path.display()))?;
    Ok(cfg)
}
