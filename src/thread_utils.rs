use std::any::Any;
use std::sync::Arc;
use std::thread::{self, JoinHandle, Thread};

use parking_lot::{Condvar, Mutex};
use tracing::{info, warn};

use crate::error::ThreadStartError;

/// State of the start handshake between a new thread and its creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartState {
    Pending,
    Running,
    AffinityFailed,
    Exited,
}

/// One-shot start notification.
///
/// The new thread posts exactly one terminal state and the creator blocks on
/// the condition variable until it sees it.
struct StartSignal {
    state: Mutex<StartState>,
    changed: Condvar,
}

impl StartSignal {
    fn new() -> Self {
        Self {
            state: Mutex::new(StartState::Pending),
            changed: Condvar::new(),
        }
    }

    fn post(&self, new_state: StartState) {
        let mut state = self.state.lock();
        if *state == StartState::Pending {
            *state = new_state;
            self.changed.notify_all();
        }
    }

    fn wait(&self) -> StartState {
        let mut state = self.state.lock();
        while *state == StartState::Pending {
            self.changed.wait(&mut state);
        }
        *state
    }
}

/// Thread-side end of a [`StartSignal`].
///
/// If the thread unwinds or returns before posting, dropping the notifier
/// reports [`StartState::Exited`] so the creator is never left waiting.
struct StartNotifier(Arc<StartSignal>);

impl StartNotifier {
    fn post(self, state: StartState) {
        self.0.post(state);
    }
}

impl Drop for StartNotifier {
    fn drop(&mut self) {
        self.0.post(StartState::Exited);
    }
}

/// Handle to a thread started by [`create_and_start_thread`].
///
/// Owned exclusively by whoever started the thread; [`join`](ThreadHandle::join)
/// consumes it, so a thread is joined at most once.
pub struct ThreadHandle<R> {
    name: String,
    inner: JoinHandle<Option<R>>,
}

impl<R> ThreadHandle<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thread(&self) -> &Thread {
        self.inner.thread()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Waits for the task to finish and returns its result.
    ///
    /// An `Err` carries the panic payload if the task panicked.
    pub fn join(self) -> thread::Result<R> {
        let name = self.name;
        self.inner.join().and_then(|result| {
            result.ok_or_else(|| {
                Box::new(format!("thread {} never ran its task", name)) as Box<dyn Any + Send>
            })
        })
    }
}

/// Starts `task` on a new thread named `name`, optionally pinned to `core_id`.
///
/// The call returns only after the new thread has either confirmed that it is
/// running (after pinning, if requested) or reported a failure. On failure the
/// thread is joined before the error is returned and `task` is never run.
///
/// # Arguments
///
/// * `core_id` - Index of the CPU core to bind to, as listed by
///   `core_affinity::get_core_ids()`, or `None` to leave scheduling to the OS
/// * `name` - Name given to the OS thread
/// * `task` - Work to run once the thread is confirmed running
///
/// # Examples
///
/// ```
/// # use spsc_logger::thread_utils::create_and_start_thread;
/// let handle = create_and_start_thread(None, "worker", || 6 * 7).unwrap();
/// assert_eq!(handle.name(), "worker");
/// assert_eq!(handle.join().unwrap(), 42);
/// ```
pub fn create_and_start_thread<F, R>(
    core_id: Option<usize>,
    name: &str,
    task: F,
) -> Result<ThreadHandle<R>, ThreadStartError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let signal = Arc::new(StartSignal::new());
    let notifier = StartNotifier(Arc::clone(&signal));
    let thread_name = name.to_string();

    let inner = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            if let Some(core_id) = core_id {
                if !pin_current_thread(core_id) {
                    warn!("Failed to set core affinity for {} to {}", thread_name, core_id);
                    notifier.post(StartState::AffinityFailed);
                    return None;
                }
                info!("Set core affinity for {} to {}", thread_name, core_id);
            }
            notifier.post(StartState::Running);
            Some(task())
        })
        .map_err(|source| ThreadStartError::Spawn {
            name: name.to_string(),
            source,
        })?;

    let error = match signal.wait() {
        StartState::Running => {
            return Ok(ThreadHandle {
                name: name.to_string(),
                inner,
            })
        }
        StartState::AffinityFailed => ThreadStartError::Affinity {
            name: name.to_string(),
            core_id: core_id.unwrap_or_default(),
        },
        StartState::Pending | StartState::Exited => ThreadStartError::Exited {
            name: name.to_string(),
        },
    };

    // The thread has already given up; this only reaps it.
    let _ = inner.join();
    Err(error)
}

fn pin_current_thread(core_id: usize) -> bool {
    let Some(core) = core_affinity::get_core_ids()
        .and_then(|cores| cores.into_iter().find(|core| core.id == core_id))
    else {
        return false;
    };
    core_affinity::set_for_current(core)
}
