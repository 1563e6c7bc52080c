use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::LoggerConfig;
use crate::error::{fatal, FormatError, LoggerError};
use crate::format;
use crate::log_element::LogElement;
use crate::loggable::Loggable;
use crate::spsc_queue::{channel, Consumer, Producer};
use crate::thread_utils::{create_and_start_thread, ThreadHandle};

/// Poll interval while `close` waits for the drain thread to empty the channel.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// What the drain thread hands back when it stops.
type DrainResult<W> = (W, Option<io::Error>);

/// A non-blocking text logger for latency-sensitive threads.
///
/// The calling thread only ever decomposes values into [`LogElement`]s and
/// copies them into a preallocated lock-free channel. A dedicated drain thread
/// renders them to the output collaborator `W`, flushes, and sleeps briefly when
/// there is nothing to do. Output is a flat stream: each element is written in
/// its natural textual form with no separators or timestamps added.
///
/// # Lifecycle
///
/// 1. **Starting** - `open`/`with_writer` builds the channel and starts the drain
///    thread, returning only once that thread is confirmed running.
/// 2. **Running** - `push`, `log` and friends enqueue elements.
/// 3. **Draining** - `close` (or drop) waits until every queued element has been
///    rendered, stops the drain thread and joins it.
/// 4. **Stopped** - the writer is flushed and closed. Logging again is a fatal
///    misuse.
///
/// # Thread Safety
///
/// A `Logger` has exactly one producer: methods that enqueue take `&mut self`,
/// and the type is not `Clone`. Move it to the thread that logs, or give each
/// logging thread its own instance.
///
/// # Examples
///
/// ```
/// # use spsc_logger::{Logger, LoggerConfig, log_record};
/// let config = LoggerConfig::default().with_capacity(1024);
/// let mut logger = Logger::with_writer("memory", Vec::<u8>::new(), config).unwrap();
///
/// log_record!(logger, "pi is about %, % digits\n", 22.0f64 / 7.0, 3);
/// logger.push("done");
///
/// let output = logger.finish().unwrap();
/// assert_eq!(
///     String::from_utf8(output).unwrap(),
///     format!("pi is about {}, 3 digits\ndone", 22.0f64 / 7.0)
/// );
/// ```
pub struct Logger<W: Write + Send + 'static = BufWriter<File>> {
    name: String,
    producer: Producer<LogElement>,
    running: Arc<AtomicBool>,
    drain_thread: Option<ThreadHandle<DrainResult<W>>>,
}

impl Logger<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and starts logging to it with
    /// the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoggerError> {
        Self::open_with_config(path, LoggerConfig::default())
    }

    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: LoggerConfig,
    ) -> Result<Self, LoggerError> {
        let path = path.as_ref();
        config.validate()?;
        let file = File::create(path).map_err(|source| LoggerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_writer(path.display().to_string(), BufWriter::new(file), config)
    }
}

impl<W: Write + Send + 'static> Logger<W> {
    /// Starts logging to an arbitrary output collaborator.
    ///
    /// `name` identifies the logger in diagnostics and, unless the config sets
    /// one, in the drain thread's name.
    pub fn with_writer(
        name: impl Into<String>,
        writer: W,
        config: LoggerConfig,
    ) -> Result<Self, LoggerError> {
        config.validate()?;
        let name = name.into();
        let thread_name = config.thread_name_for(&name)?;
        let (producer, consumer) = channel::<LogElement>(config.capacity);
        let running = Arc::new(AtomicBool::new(true));

        let drain_running = Arc::clone(&running);
        let idle_interval = config.idle_interval;
        let drain_thread = create_and_start_thread(
            config.core_id,
            &thread_name,
            move || drain(consumer, writer, &drain_running, idle_interval),
        )?;

        info!(
            "Opened logger {} with {} slots on thread {}",
            name,
            producer.capacity(),
            drain_thread.name()
        );

        Ok(Self {
            name,
            producer,
            running,
            drain_thread: Some(drain_thread),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of queued elements the drain thread has not rendered yet.
    pub fn pending(&self) -> usize {
        self.producer.len()
    }

    pub fn capacity(&self) -> usize {
        self.producer.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.drain_thread.is_none()
    }

    /// Enqueues a single element.
    #[inline]
    pub fn push_element(&mut self, element: LogElement) {
        self.ensure_open();
        self.producer.push(element);
    }

    /// Enqueues `value` as one element per scalar or character.
    #[inline]
    pub fn push<T: Loggable + ?Sized>(&mut self, value: &T) {
        self.ensure_open();
        value.push_elements(&mut self.producer);
    }

    /// Enqueues `fmt` with each `%` replaced by the next argument and `%%`
    /// written as a literal `%`.
    ///
    /// # Panics
    ///
    /// A placeholder/argument mismatch is a defect at the call site and panics
    /// with a `FATAL` message; nothing from the call is enqueued. Use
    /// [`try_log`](Logger::try_log) to get the error instead.
    #[inline]
    pub fn log(&mut self, fmt: &str, args: &[&dyn Loggable]) {
        if let Err(err) = self.try_log(fmt, args) {
            fatal(err);
        }
    }

    pub fn try_log(&mut self, fmt: &str, args: &[&dyn Loggable]) -> Result<(), FormatError> {
        self.ensure_open();
        format::decompose(fmt, args, &mut self.producer)
    }

    /// Drains the channel, stops the drain thread and closes the output.
    ///
    /// Blocks until everything enqueued so far has been rendered. Calling it
    /// again after it succeeded (or failed) does nothing.
    pub fn close(&mut self) -> Result<(), LoggerError> {
        self.shutdown().map(drop)
    }

    /// Like [`close`](Logger::close), but hands back the flushed writer.
    pub fn finish(mut self) -> Result<W, LoggerError> {
        match self.shutdown()? {
            Some(writer) => Ok(writer),
            None => Err(LoggerError::Closed(self.name.clone())),
        }
    }

    #[inline(always)]
    fn ensure_open(&self) {
        if self.drain_thread.is_none() {
            fatal(format_args!("log() called on closed logger {}", self.name));
        }
    }

    fn shutdown(&mut self) -> Result<Option<W>, LoggerError> {
        let Some(drain_thread) = self.drain_thread.take() else {
            return Ok(None);
        };
        info!("Flushing and closing logger {}", self.name);

        // No timeout: every element accepted so far must reach the output.
        while !self.producer.is_empty() && !drain_thread.is_finished() {
            thread::sleep(SHUTDOWN_POLL_INTERVAL);
        }

        self.running.store(false, Ordering::Release);
        let (writer, output_error) = drain_thread
            .join()
            .map_err(|_| LoggerError::DrainPanicked(self.name.clone()))?;

        match output_error {
            Some(err) => Err(LoggerError::Output(err)),
            None => Ok(Some(writer)),
        }
    }
}

impl<W: Write + Send + 'static> Drop for Logger<W> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            error!("Error while closing logger {}: {}", self.name, err);
        }
    }
}

/// Body of the drain thread.
///
/// Renders everything visible, flushes if anything was written, and sleeps for
/// `idle_interval` when the channel was empty. Once `running` is cleared it
/// drains one last time and returns the writer along with the first output
/// error, if any. Write errors do not stop consumption.
fn drain<W: Write>(
    mut consumer: Consumer<LogElement>,
    mut writer: W,
    running: &AtomicBool,
    idle_interval: Duration,
) -> DrainResult<W> {
    let mut first_error: Option<io::Error> = None;

    while running.load(Ordering::Acquire) {
        if drain_available(&mut consumer, &mut writer, &mut first_error) == 0 {
            thread::sleep(idle_interval);
        }
    }
    drain_available(&mut consumer, &mut writer, &mut first_error);

    debug!("Drain thread stopping");
    (writer, first_error)
}

fn drain_available<W: Write>(
    consumer: &mut Consumer<LogElement>,
    writer: &mut W,
    first_error: &mut Option<io::Error>,
) -> usize {
    let mut rendered = 0;
    while let Some(slot) = consumer.peek() {
        if let Err(err) = write!(writer, "{}", *slot) {
            record_error(first_error, err);
        }
        slot.release();
        rendered += 1;
    }
    if rendered > 0 {
        if let Err(err) = writer.flush() {
            record_error(first_error, err);
        }
    }
    rendered
}

fn record_error(first_error: &mut Option<io::Error>, err: io::Error) {
    error!("Log output error: {}", err);
    if first_error.is_none() {
        *first_error = Some(err);
    }
}

/// Logs a `%`-style formatted record.
///
/// Each `%` in the format string is replaced by the next argument and `%%`
/// produces a literal `%`. A placeholder/argument mismatch panics with a
/// `FATAL` message.
///
/// # Examples
///
/// ```
/// # use spsc_logger::{Logger, LoggerConfig, log_record};
/// let mut logger = Logger::with_writer("memory", Vec::<u8>::new(), LoggerConfig::default().with_capacity(64)).unwrap();
/// log_record!(logger, "a%b%c", 1, 2);
/// log_record!(logger, " 100%%");
/// let output = logger.finish().unwrap();
/// assert_eq!(output, b"a1b2c 100%");
/// ```
#[macro_export]
macro_rules! log_record {
    ($logger:expr, $fmt:expr $(,)?) => {
        $logger.log($fmt, &[])
    };
    ($logger:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $logger.log($fmt, &[$(&$arg as &dyn $crate::Loggable),+])
    };
}
