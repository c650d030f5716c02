use std::fmt;
use std::process::Child;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tracing::trace;

use crate::error::ProcessError;
use crate::runner::ProcessResult;

#[derive(Debug, Clone, Copy)]
enum Signal {
    Stop,
    Continue,
    Terminate,
    Interrupt,
}

/// A spawned child shared between its handle and the thread waiting for it.
///
/// The child is only reaped while the lock is held, in the same critical
/// section that sets `finished`. Signals are sent under the same lock, so a
/// signal never reaches a pid that was already released to the OS.
#[derive(Debug)]
pub(crate) struct SharedChild {
    state: Mutex<ChildState>,
}

#[derive(Debug)]
pub(crate) struct ChildState {
    pub(crate) child: Child,
    pub(crate) finished: bool,
}

impl SharedChild {
    pub(crate) fn new(child: Child) -> Self {
        Self {
            state: Mutex::new(ChildState {
                child,
                finished: false,
            }),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ChildState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A process started with [`ProcessRunner::spawn`](crate::ProcessRunner::spawn)
/// or [`spawn_with`](crate::ProcessRunner::spawn_with).
///
/// The signalling methods return `false` once the process has exited, and
/// always on platforms without POSIX signals.
pub struct ProcessHandle<T = Result<ProcessResult, ProcessError>> {
    pid: u32,
    child: Arc<SharedChild>,
    waiter: JoinHandle<T>,
}

impl<T> ProcessHandle<T> {
    pub(crate) fn new(pid: u32, child: Arc<SharedChild>, waiter: JoinHandle<T>) -> Self {
        Self { pid, child, waiter }
    }

    /// OS process id.
    pub fn id(&self) -> u32 {
        self.pid
    }

    /// `false` once the process has been collected, or waiting for it
    /// failed.
    pub fn is_running(&self) -> bool {
        !self.child.lock().finished
    }

    /// Stops the process (`SIGSTOP`).
    pub fn suspend(&self) -> bool {
        self.signal(Signal::Stop)
    }

    /// Continues a suspended process (`SIGCONT`).
    pub fn resume(&self) -> bool {
        self.signal(Signal::Continue)
    }

    /// Asks the process to terminate (`SIGTERM`).
    pub fn terminate(&self) -> bool {
        self.signal(Signal::Terminate)
    }

    /// Interrupts the process (`SIGINT`), as Ctrl+C would.
    pub fn interrupt(&self) -> bool {
        self.signal(Signal::Interrupt)
    }

    /// Blocks until the process has exited and its completion callback, if
    /// any, has run.
    pub fn wait(self) -> T {
        match self.waiter.join() {
            Ok(value) => value,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    #[cfg(unix)]
    fn signal(&self, signal: Signal) -> bool {
        let Ok(pid) = libc::pid_t::try_from(self.pid) else {
            return false;
        };
        let number = match signal {
            Signal::Stop => libc::SIGSTOP,
            Signal::Continue => libc::SIGCONT,
            Signal::Terminate => libc::SIGTERM,
            Signal::Interrupt => libc::SIGINT,
        };

        let state = self.child.lock();
        if state.finished {
            return false;
        }

        // SAFETY: kill(2) only delivers a signal. The pid is our own child,
        // which is reaped only while `state` is locked, and `finished` is set
        // in that same critical section. An exited but unreaped child still
        // owns its pid.
        let sent = unsafe { libc::kill(pid, number) } == 0;
        drop(state);

        trace!(pid, ?signal, sent, "signalled process");
        sent
    }

    #[cfg(not(unix))]
    fn signal(&self, signal: Signal) -> bool {
        trace!(pid = self.pid, ?signal, "signals are not supported here");
        false
    }
}

impl<T> fmt::Debug for ProcessHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
