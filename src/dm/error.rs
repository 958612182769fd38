use thiserror::Error;

/// Failure taxonomy for the controller and its collaborators.
///
/// `NotFound` is not an error to callers of the controller: a missing pid
/// record is the normal "never started" state and both ensure-running and
/// ensure-stopped absorb it. It only surfaces from the record store itself.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("no pid record found")]
    NotFound,

    #[error("i/o error: {0}")]
    Io(#[source] std::io::Error),

    #[error("failed to launch daemon: {0}")]
    Launch(#[source] std::io::Error),

    #[error("could not kill daemon")]
    Timeout,
}
