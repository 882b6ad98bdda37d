//! Per-run cancellation and child process termination

use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::process::Child;
use tokio::sync::Notify;

/// How a child process was brought down
#[derive(Debug)]
pub enum Termination {
    /// The process had already exited on its own
    AlreadyExited(ExitStatus),
    /// The process exited within the grace window after a terminate request
    Graceful(ExitStatus),
    /// The process was forcefully killed
    Killed,
    /// Forceful kill failed; the process may still be running
    KillFailed(String),
}

/// Cancellation state owned by a single run
///
/// Holds the stop flag and the running child, if one has been spawned. The
/// flag only ever goes from clear to set.
#[derive(Debug)]
pub struct RunContext {
    cancelled: AtomicBool,
    notify: Notify,
    child: Mutex<Option<Child>>,
    grace: Duration,
}

impl RunContext {
    pub fn new(grace: Duration) -> Arc<Self> {
        Arc::new(Self {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
            child: Mutex::new(None),
            grace,
        })
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Set the stop flag and wake waiters. Returns false if it was already set.
    pub fn request(&self) -> bool {
        let first = !self.cancelled.swap(true, Ordering::SeqCst);
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    /// Resolve once the stop flag is set
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register the running child. Hands it back if the run is already cancelled.
    pub fn attach_child(&self, child: Child) -> Result<(), Child> {
        let mut slot = self.slot();
        if self.is_cancelled() {
            return Err(child);
        }
        *slot = Some(child);
        Ok(())
    }

    /// Take ownership of the registered child, if any
    pub fn take_child(&self) -> Option<Child> {
        self.slot().take()
    }

    pub fn has_child(&self) -> bool {
        self.slot().is_some()
    }

    /// Stop the run: set the flag, then terminate the child if one is attached
    ///
    /// Safe to call at any time and more than once; later calls find no child.
    pub async fn cancel(&self) -> Option<Termination> {
        let child = {
            let mut slot = self.slot();
            self.request();
            slot.take()
        };

        match child {
            Some(child) => Some(terminate_child(child, self.grace).await),
            None => None,
        }
    }

    pub fn handle(self: &Arc<Self>) -> CancelHandle {
        CancelHandle {
            context: Arc::clone(self),
        }
    }
}

/// Cloneable handle for stopping a run from another task
#[derive(Debug, Clone)]
pub struct CancelHandle {
    context: Arc<RunContext>,
}

impl CancelHandle {
    pub async fn cancel(&self) -> Option<Termination> {
        self.context.cancel().await
    }

    /// Set the stop flag without touching the child
    pub fn request(&self) -> bool {
        self.context.request()
    }

    pub fn is_cancelled(&self) -> bool {
        self.context.is_cancelled()
    }
}

/// Ask the child to exit, then kill it if it outlives the grace window
pub async fn terminate_child(mut child: Child, grace: Duration) -> Termination {
    if let Ok(Some(status)) = child.try_wait() {
        return Termination::AlreadyExited(status);
    }

    request_exit(&mut child);

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => Termination::Graceful(status),
        _ => match child.kill().await {
            Ok(()) => Termination::Killed,
            Err(e) => Termination::KillFailed(e.to_string()),
        },
    }
}

#[cfg(unix)]
fn request_exit(child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    // id() is None once the child has been reaped
    if let Some(pid) = child.id() {
        let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
    }
}

// No graceful signal exists for console children here; go straight to kill.
#[cfg(not(unix))]
fn request_exit(child: &mut Child) {
    let _ = child.start_kill();
}
