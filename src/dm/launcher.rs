use std::fs;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use nix::unistd::setsid;

use crate::dm::error::ControlError;

/// Starts a new detached daemon process and reports its pid.
pub trait ProcessLauncher {
    fn spawn(&self) -> Result<u32, ControlError>;
}

/// Launches the configured command with stdout/stderr redirected into files
/// (truncated on every spawn), stdin disconnected, and the child moved into
/// its own session so the launcher's exit cannot take it down.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    command: String,
    args: Vec<String>,
    stdout_path: PathBuf,
    stderr_path: PathBuf,
}

impl CommandLauncher {
    pub fn new(
        command: String,
        args: Vec<String>,
        stdout_path: PathBuf,
        stderr_path: PathBuf,
    ) -> Self {
        Self {
            command,
            args,
            stdout_path,
            stderr_path,
        }
    }
}

impl ProcessLauncher for CommandLauncher {
    fn spawn(&self) -> Result<u32, ControlError> {
        // Redirect-file open failures are plain i/o errors; only the spawn
        // itself (missing executable etc) is a launch failure.
        let stdout_file = fs::File::create(&self.stdout_path).map_err(ControlError::Io)?;
        let stderr_file = fs::File::create(&self.stderr_path).map_err(ControlError::Io)?;

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file));

        // Child-side: leave the launcher's session and process group before
        // exec, so signals aimed at the launcher never reach the daemon.
        unsafe {
            cmd.pre_exec(|| {
                let _ = setsid();
                Ok(())
            });
        }

        let child = cmd.spawn().map_err(ControlError::Launch)?;
        let pid = child.id();
        // Drop the handle to disown the child; we never wait on it, and we
        // return without waiting for the daemon to initialize.
        drop(child);
        Ok(pid)
    }
}
