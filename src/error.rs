use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while setting up or shutting down a [`Logger`](crate::Logger).
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The output destination could not be opened.
    #[error("could not open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration value was rejected before anything was started.
    #[error("invalid logger configuration: {0}")]
    InvalidConfig(&'static str),

    /// The drain thread could not be started.
    #[error(transparent)]
    ThreadStart(#[from] ThreadStartError),

    /// Writing to or flushing the output collaborator failed.
    #[error("log output failed: {0}")]
    Output(#[source] io::Error),

    /// The logger was already closed, so there is no writer left to return.
    #[error("logger {0} is already closed")]
    Closed(String),

    /// The drain thread panicked instead of returning its writer.
    #[error("drain thread for {0} panicked")]
    DrainPanicked(String),
}

/// Reasons a thread started through
/// [`create_and_start_thread`](crate::thread_utils::create_and_start_thread)
/// never reported itself as running.
#[derive(Debug, Error)]
pub enum ThreadStartError {
    #[error("failed to spawn thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to set core affinity for {name} to core {core_id}")]
    Affinity { name: String, core_id: usize },

    #[error("thread {name} exited before reporting it was running")]
    Exited { name: String },
}

/// Mismatch between the placeholders of a format string and its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing arguments to log(): {placeholders} placeholder(s), {arguments} argument(s)")]
    MissingArguments { placeholders: usize, arguments: usize },

    #[error("extra arguments provided to log(): {placeholders} placeholder(s), {arguments} argument(s)")]
    ExtraArguments { placeholders: usize, arguments: usize },
}

/// Reports a programmer error and unwinds the calling thread.
///
/// Used for call-site defects that must never be silently tolerated, such as a
/// format string whose placeholders do not match its arguments.
#[cold]
#[inline(never)]
pub fn fatal(msg: impl std::fmt::Display) -> ! {
    tracing::error!("FATAL : {}", msg);
    panic!("FATAL : {}", msg);
}
