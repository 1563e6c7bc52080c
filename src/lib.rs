//! # SPSC Logger
//!
//! A non-blocking text logger for latency-sensitive hot paths, built from three
//! pieces:
//!
//! * **Lock-free hand-off**: a preallocated single-producer/single-consumer ring
//!   carries records from the logging thread to a background writer
//! * **Allocation-free records**: every logged value is broken down into small
//!   `Copy` [`LogElement`]s, so nothing on the hot path allocates or refers back
//!   to caller-owned memory
//! * **Deterministic startup**: the writer thread is started (and optionally
//!   pinned to a CPU core) before the logger is handed out, and any failure is
//!   reported to the caller right away
//!
//! The logging thread never performs file I/O and never takes a lock. It only
//! waits if the ring is completely full, and then only until the writer frees a
//! slot. Records are never dropped.
//!
//! ## Main Components
//!
//! * [`Logger`]: owns the ring and the drain thread; the producer-side API
//! * [`spsc_queue`]: the fixed-capacity SPSC ring with separate producer and
//!   consumer handles
//! * [`LogElement`] and [`Loggable`]: the record type and how values decompose
//!   into it
//! * [`format`]: `%` placeholder decomposition behind [`log_record!`]
//! * [`thread_utils`]: starting a thread with a confirmed-running handshake
//!
//! ## Quick Start
//!
//! ```no_run
//! use spsc_logger::{log_record, Logger};
//!
//! let mut logger = Logger::open("example.log").unwrap();
//! log_record!(logger, "Starting to log\n");
//! log_record!(logger, "integer: %, pi: %\n", 101, 22.0f64 / 7.0);
//! logger.close().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod log_element;
pub mod loggable;
pub mod logger;
pub mod spsc_queue;
pub mod thread_utils;

pub use config::LoggerConfig;
pub use error::{FormatError, LoggerError, ThreadStartError};
pub use log_element::{ElementSink, LogElement, LogKind};
pub use loggable::Loggable;
pub use logger::Logger;
