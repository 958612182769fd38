use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::time;

use crate::dm::dm_event;
use crate::dm::error::ControlError;
use crate::dm::probe::LivenessProbe;

/// Stop-sequence timing knobs.
///
/// The defaults leave only 500ms between SIGKILL and giving up; on systems
/// that reap slowly that window can produce spurious timeouts, so all three
/// are exposed through the config file rather than hardcoded.
#[derive(Debug, Clone, Copy)]
pub struct StopTimings {
    /// Liveness re-check cadence while waiting for the daemon to exit.
    pub poll_interval: Duration,
    /// Elapsed time after the interrupt at which SIGKILL is sent.
    pub force_kill_after: Duration,
    /// Elapsed time after the interrupt at which the stop fails outright.
    pub give_up_after: Duration,
}

impl Default for StopTimings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            force_kill_after: Duration::from_millis(1000),
            give_up_after: Duration::from_millis(1500),
        }
    }
}

/// What a signal delivery attempt learned about the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDelivery {
    Delivered,
    /// The process was already gone (ESRCH). Losing the race to the process's
    /// own exit is a success, not an error.
    Gone,
}

/// Delivery seam for the two termination signals.
pub trait ProcessSignaler {
    /// Graceful termination request the daemon may catch and act on.
    fn interrupt(&self, pid: u32) -> Result<SignalDelivery, ControlError>;

    /// Non-ignorable kill.
    fn force_kill(&self, pid: u32) -> Result<SignalDelivery, ControlError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaler;

impl NixSignaler {
    fn send(pid: u32, sig: Signal) -> Result<SignalDelivery, ControlError> {
        match kill(Pid::from_raw(pid as i32), sig) {
            Ok(()) => Ok(SignalDelivery::Delivered),
            Err(Errno::ESRCH) => Ok(SignalDelivery::Gone),
            Err(e) => Err(ControlError::Io(std::io::Error::from_raw_os_error(e as i32))),
        }
    }
}

impl ProcessSignaler for NixSignaler {
    fn interrupt(&self, pid: u32) -> Result<SignalDelivery, ControlError> {
        Self::send(pid, Signal::SIGTERM)
    }

    fn force_kill(&self, pid: u32) -> Result<SignalDelivery, ControlError> {
        Self::send(pid, Signal::SIGKILL)
    }
}

/// Terminal outcome of one stop sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No record was ever written, or the recorded pid was already dead.
    /// No signal was sent.
    AlreadyStopped,
    /// The daemon exited after being signaled.
    Stopped,
}

/// Drives the escalating stop sequence for one target pid.
///
/// One coordinator per ensure-stopped call; the poll interval and both
/// deadline timers are locals of [`ensure_stopped`](Self::ensure_stopped), so
/// every return path drops them and no scheduled work outlives the call.
pub struct ShutdownCoordinator<'a, P, G> {
    probe: &'a P,
    signaler: &'a G,
    timings: StopTimings,
}

impl<'a, P: LivenessProbe, G: ProcessSignaler> ShutdownCoordinator<'a, P, G> {
    pub fn new(probe: &'a P, signaler: &'a G, timings: StopTimings) -> Self {
        Self {
            probe,
            signaler,
            timings,
        }
    }

    /// Stop `pid`, escalating force over time. Never hangs: either the daemon
    /// is observed dead within `give_up_after` of the interrupt, or this
    /// fails with [`ControlError::Timeout`].
    ///
    /// Sequence: interrupt immediately, re-check liveness every
    /// `poll_interval`, SIGKILL at `force_kill_after` if still alive, give up
    /// at `give_up_after`. Both deadlines are measured from the interrupt.
    pub async fn ensure_stopped(&self, pid: Option<u32>) -> Result<StopOutcome, ControlError> {
        let Some(pid) = pid else {
            return Ok(StopOutcome::AlreadyStopped);
        };
        if !self.probe.is_alive(pid) {
            return Ok(StopOutcome::AlreadyStopped);
        }

        dm_event("stop", format!("decision=interrupt pid={pid}"));
        if self.signaler.interrupt(pid)? == SignalDelivery::Gone {
            return Ok(StopOutcome::Stopped);
        }

        let start = time::Instant::now();
        let mut poll = time::interval_at(start + self.timings.poll_interval, self.timings.poll_interval);
        let force_at = time::sleep_until(start + self.timings.force_kill_after);
        let give_up_at = time::sleep_until(start + self.timings.give_up_after);
        tokio::pin!(force_at);
        tokio::pin!(give_up_at);
        let mut forced = false;

        // Biased so a poll due at the same instant as a deadline runs first:
        // a daemon seen dead at exactly 1000ms is a clean stop, not a kill.
        loop {
            tokio::select! {
                biased;
                _ = poll.tick() => {
                    if !self.probe.is_alive(pid) {
                        return Ok(StopOutcome::Stopped);
                    }
                }
                _ = &mut force_at, if !forced => {
                    forced = true;
                    dm_event(
                        "stop",
                        format!(
                            "decision=force_kill pid={pid} elapsed_ms={}",
                            start.elapsed().as_millis()
                        ),
                    );
                    if self.signaler.force_kill(pid)? == SignalDelivery::Gone {
                        return Ok(StopOutcome::Stopped);
                    }
                }
                _ = &mut give_up_at => {
                    dm_event("stop", format!("outcome=gave_up pid={pid}"));
                    return Err(ControlError::Timeout);
                }
            }
        }
    }
}
