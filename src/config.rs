use std::time::Duration;

use crate::error::LoggerError;

/// Default number of slots in a logger's channel.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8 * 1024 * 1024;

/// How long the drain thread sleeps after finding the channel empty.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(10);

/// Settings for a [`Logger`](crate::Logger).
///
/// # Examples
///
/// ```
/// # use spsc_logger::LoggerConfig;
/// # use std::time::Duration;
/// let config = LoggerConfig::default()
///     .with_capacity(1024)
///     .with_idle_interval(Duration::from_millis(1));
/// assert_eq!(config.capacity, 1024);
/// assert!(config.core_id.is_none());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Minimum number of records the channel holds; rounded up to a power of two.
    pub capacity: usize,
    /// CPU core the drain thread is bound to, if any.
    pub core_id: Option<usize>,
    /// How long the drain thread sleeps after finding the channel empty.
    pub idle_interval: Duration,
    /// Name of the drain thread. Defaults to `logger/<destination>`.
    pub thread_name: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            core_id: None,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            thread_name: None,
        }
    }
}

impl LoggerConfig {
    /// Sets the minimum channel capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Binds the drain thread to `core_id`.
    pub fn with_core(mut self, core_id: usize) -> Self {
        self.core_id = Some(core_id);
        self
    }

    /// Sets the drain thread's sleep when the channel is empty.
    pub fn with_idle_interval(mut self, idle_interval: Duration) -> Self {
        self.idle_interval = idle_interval;
        self
    }

    /// Overrides the drain thread's name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// Rejects settings a logger cannot start with.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.capacity == 0 {
            return Err(LoggerError::InvalidConfig("capacity must be at least 1"));
        }
        if self.idle_interval.is_zero() {
            return Err(LoggerError::InvalidConfig("idle interval must be non-zero"));
        }
        if self.thread_name.as_deref().map_or(false, has_nul) {
            return Err(LoggerError::InvalidConfig("thread name must not contain NUL"));
        }
        Ok(())
    }

    /// Name for the drain thread of a logger writing to `destination`.
    ///
    /// Fails if the derived name contains a NUL, which thread names cannot hold.
    pub(crate) fn thread_name_for(&self, destination: &str) -> Result<String, LoggerError> {
        let name = self
            .thread_name
            .clone()
            .unwrap_or_else(|| format!("logger/{}", destination));
        if has_nul(&name) {
            return Err(LoggerError::InvalidConfig("thread name must not contain NUL"));
        }
        Ok(name)
    }
}

fn has_nul(name: &str) -> bool {
    name.contains('\0')
}
