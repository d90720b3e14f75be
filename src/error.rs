use thiserror::Error;
use tracing::{error, warn};

use crate::menu::{ActionIdError, TransportError};

/// Errors surfaced to the search host binding
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Invalid action id: {0}")]
    InvalidActionId(#[from] ActionIdError),

    #[error("Menu transport failed: {0}")]
    Transport(#[from] TransportError),
}

impl RunnerError {
    /// Short message suitable for a host-visible fault
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidActionId(e) => format!("Malformed match id: {}", e),
            Self::Transport(e) => format!("Could not activate menu item: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the host doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use appmenu_runner::error::ResultExt;
///
/// // Log and degrade to "no menu" if the transport fails
/// let entries = load_menu(&transport, &source, " » ").warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for unexpected failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = %err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = %err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
