use crate::dm::config::ControlConfig;
use crate::dm::dm_event;
use crate::dm::error::ControlError;
use crate::dm::launcher::{CommandLauncher, ProcessLauncher};
use crate::dm::probe::{LivenessProbe, SignalProbe};
use crate::dm::shutdown::{NixSignaler, ProcessSignaler, ShutdownCoordinator, StopOutcome, StopTimings};
use crate::dm::store::{FsPidRecordStore, PidRecordStore};

/// Outcome of an ensure-running call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The recorded pid is still alive; nothing was spawned.
    AlreadyRunning(u32),
    /// A fresh daemon was spawned and its pid persisted.
    Started(u32),
}

/// Facade composing the record store, liveness probe, launcher and signaler
/// into the three public operations. All collaborators are injected; nothing
/// is looked up from ambient global state.
///
/// The pid record path is read and written without locking: concurrent
/// invocations against the same path race freely (last writer wins). Callers
/// are expected to serialize invocations externally.
pub struct Controller<S, P, L, G> {
    store: S,
    probe: P,
    launcher: L,
    signaler: G,
    timings: StopTimings,
}

impl Controller<FsPidRecordStore, SignalProbe, CommandLauncher, NixSignaler> {
    /// Production wiring from the config file.
    pub fn from_config(cfg: &ControlConfig) -> Self {
        Controller::new(
            FsPidRecordStore::new(cfg.pidpath.clone()),
            SignalProbe,
            CommandLauncher::new(
                cfg.command.clone(),
                cfg.args.clone(),
                cfg.stdout_path.clone(),
                cfg.stderr_path.clone(),
            ),
            NixSignaler,
            cfg.stop_timings(),
        )
    }
}

impl<S, P, L, G> Controller<S, P, L, G>
where
    S: PidRecordStore,
    P: LivenessProbe,
    L: ProcessLauncher,
    G: ProcessSignaler,
{
    pub fn new(store: S, probe: P, launcher: L, signaler: G, timings: StopTimings) -> Self {
        Self {
            store,
            probe,
            launcher,
            signaler,
            timings,
        }
    }

    /// Idempotent start: spawns only if the recorded pid is absent or dead.
    ///
    /// A missing record reads as "not running"; liveness is always verified
    /// against the process table rather than trusting the record, so a stale
    /// record from a daemon that died (or was stopped) is simply overwritten.
    pub async fn ensure_running(&self) -> Result<RunOutcome, ControlError> {
        match self.store.read() {
            Ok(pid) if self.probe.is_alive(pid) => {
                dm_event("start", format!("decision=noop daemon already running pid={pid}"));
                Ok(RunOutcome::AlreadyRunning(pid))
            }
            Ok(_) | Err(ControlError::NotFound) => {
                let pid = self.launcher.spawn()?;
                self.store.write(pid)?;
                dm_event("start", format!("outcome=started pid={pid}"));
                Ok(RunOutcome::Started(pid))
            }
            Err(e) => Err(e),
        }
    }

    /// Graceful-then-forced stop of the recorded daemon, if any.
    ///
    /// The record is left in place afterwards; a dead recorded pid is a
    /// normal state the next ensure-running handles on its own.
    pub async fn ensure_stopped(&self) -> Result<StopOutcome, ControlError> {
        let pid = match self.store.read() {
            Ok(pid) => Some(pid),
            Err(ControlError::NotFound) => None,
            Err(e) => return Err(e),
        };
        let coordinator = ShutdownCoordinator::new(&self.probe, &self.signaler, self.timings);
        let outcome = coordinator.ensure_stopped(pid).await?;
        match outcome {
            StopOutcome::AlreadyStopped => dm_event("stop", "decision=noop daemon not running"),
            StopOutcome::Stopped => {
                dm_event("stop", format!("outcome=stopped pid={}", pid.unwrap_or(0)))
            }
        }
        Ok(outcome)
    }

    /// Stop followed by start, strictly sequential. A stop timeout propagates
    /// and no new daemon is spawned over one we failed to kill.
    pub async fn restart(&self) -> Result<RunOutcome, ControlError> {
        self.ensure_stopped().await?;
        self.ensure_running().await
    }
}
