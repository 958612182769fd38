use std::fs;
use std::io;
use std::path::PathBuf;

use crate::dm::error::ControlError;

/// Persistence seam for the "which pid did we last start" record.
pub trait PidRecordStore {
    /// `NotFound` if no record exists; any other read failure is `Io`.
    fn read(&self) -> Result<u32, ControlError>;

    /// Replaces any prior record, creating missing parent directories first.
    fn write(&self, pid: u32) -> Result<(), ControlError>;
}

/// Pid record as a plain file holding the decimal pid, no trailing newline.
///
/// The record is never deleted: a record whose pid is no longer alive is a
/// normal state ("stale record"), and liveness is always re-verified by the
/// caller rather than inferred from the record's presence.
#[derive(Debug, Clone)]
pub struct FsPidRecordStore {
    path: PathBuf,
}

impl FsPidRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PidRecordStore for FsPidRecordStore {
    fn read(&self) -> Result<u32, ControlError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ControlError::NotFound),
            Err(e) => return Err(ControlError::Io(e)),
        };
        // A record that doesn't parse as a pid gets the same treatment as a
        // missing one: the next start probes nothing and overwrites it.
        raw.trim().parse::<u32>().map_err(|_| ControlError::NotFound)
    }

    fn write(&self, pid: u32) -> Result<(), ControlError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(ControlError::Io)?;
            }
        }
        // Stage then rename so a concurrent reader sees either the old record
        // or the new one, never a half-written pid.
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, pid.to_string()).map_err(ControlError::Io)?;
        fs::rename(&staging, &self.path).map_err(ControlError::Io)
    }
}
