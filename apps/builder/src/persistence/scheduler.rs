//! Trailing-edge debounce timer owned by the persistence coordinator.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs a task once `window` has elapsed with no further `schedule` call.
///
/// Each `schedule` cancels the pending timer and starts a new one. Only the
/// *timer* is cancellable: once the window elapses the task is spawned on its
/// own and runs to completion even if `schedule` is called again meanwhile.
pub struct Debouncer {
    window: Duration,
    timer: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            timer: None,
        }
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let window = self.window;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            tokio::spawn(task);
        }));
    }

    /// Cancels the pending timer. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
