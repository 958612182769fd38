use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;

/// Answers whether a pid currently names a live process.
pub trait LivenessProbe {
    fn is_alive(&self, pid: u32) -> bool;
}

/// Probes the OS process table with signal 0 (nothing is delivered).
///
/// Pid reuse means a `true` here may refer to an unrelated process that
/// inherited the id after our daemon exited. The OS offers nothing stronger,
/// so that false positive is accepted rather than papered over.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalProbe;

impl LivenessProbe for SignalProbe {
    fn is_alive(&self, pid: u32) -> bool {
        match kill(Pid::from_raw(pid as i32), None) {
            Ok(()) => true,
            // EPERM: the process exists but belongs to someone else.
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }
}
