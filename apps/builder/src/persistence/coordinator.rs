//! Persistence Coordinator — schedules a debounced persistence attempt after
//! every mutation and publishes the save indicator.
//!
//! Flow per mutation: the latest snapshot replaces the pending one and the
//! debounce timer restarts. When the quiet window elapses the pending snapshot
//! is taken and written to the session's sink. Attempts are numbered; only the
//! newest attempt may set the final indicator, so a slow older request that
//! completes late never overwrites newer information.
//!
//! A failure stays on the indicator while the next attempt runs; only a
//! success replaces it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::document::model::DocumentModel;
use crate::document::store::{ChangeEvent, DocumentObserver};
use crate::persistence::scheduler::Debouncer;
use crate::persistence::status::SaveStatus;
use crate::persistence::{PersistError, PersistenceSink};

struct Inner {
    sink: Arc<dyn PersistenceSink>,
    debouncer: Mutex<Debouncer>,
    pending: Mutex<Option<DocumentModel>>,
    last_attempt: AtomicU64,
    /// Attempts whose sink call has not returned yet.
    in_flight: watch::Sender<usize>,
    status: watch::Sender<SaveStatus>,
    display_window: Duration,
}

/// Cheap to clone; all clones drive the same timer and indicator.
#[derive(Clone)]
pub struct PersistenceCoordinator {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PersistenceCoordinator {
    pub fn new(
        sink: Arc<dyn PersistenceSink>,
        debounce_window: Duration,
        display_window: Duration,
    ) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                sink,
                debouncer: Mutex::new(Debouncer::new(debounce_window)),
                pending: Mutex::new(None),
                last_attempt: AtomicU64::new(0),
                in_flight: watch::channel(0).0,
                status,
                display_window,
            }),
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.inner.status.borrow().clone()
    }

    pub fn destination(&self) -> &'static str {
        self.inner.sink.describe()
    }

    /// Replaces the pending snapshot and restarts the quiet window.
    pub fn schedule(&self, model: DocumentModel) {
        *lock(&self.inner.pending) = Some(model);
        let inner = self.inner.clone();
        lock(&self.inner.debouncer).schedule(async move {
            inner.persist_pending().await;
        });
    }

    /// Persists the pending snapshot now, skipping the rest of the window.
    /// Waits for attempts already in flight first, so the final write is the
    /// last one to reach the sink. Used when the session ends.
    pub async fn flush(&self) {
        lock(&self.inner.debouncer).cancel();
        let mut in_flight = self.inner.in_flight.subscribe();
        loop {
            let _ = in_flight.wait_for(|count| *count == 0).await;
            match self.inner.claim() {
                Claim::Attempt(model) => self.inner.clone().run_attempt(model).await,
                Claim::Busy => continue,
                Claim::Idle => break,
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.inner.pending).is_some()
    }
}

enum Claim {
    Attempt(DocumentModel),
    /// Nothing pending, but an earlier attempt is still running.
    Busy,
    Idle,
}

/// Counts one running attempt; released when the sink call returns or the
/// task is dropped.
struct InFlight<'a>(&'a watch::Sender<usize>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|count| *count -= 1);
    }
}

impl Inner {
    /// Takes the pending snapshot. The in-flight count is raised under the
    /// same lock, so a flush always sees either the snapshot or its attempt.
    fn claim(&self) -> Claim {
        let mut pending = lock(&self.pending);
        match pending.take() {
            Some(model) => {
                self.in_flight.send_modify(|count| *count += 1);
                Claim::Attempt(model)
            }
            None if *self.in_flight.borrow() > 0 => Claim::Busy,
            None => Claim::Idle,
        }
    }

    async fn persist_pending(self: Arc<Self>) {
        if let Claim::Attempt(model) = self.claim() {
            self.run_attempt(model).await;
        }
    }

    async fn run_attempt(self: Arc<Self>, model: DocumentModel) {
        let _running = InFlight(&self.in_flight);
        let attempt = self.last_attempt.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.send_if_modified(|status| match status {
            SaveStatus::Failed { .. } => false,
            _ => {
                *status = SaveStatus::Saving { attempt };
                true
            }
        });
        info!(attempt, destination = self.sink.describe(), "Persisting draft");

        let result = self.sink.persist(&model).await;
        self.complete(attempt, result);
    }

    fn complete(self: &Arc<Self>, attempt: u64, result: Result<(), PersistError>) {
        let newest = self.last_attempt.load(Ordering::SeqCst);
        if attempt != newest {
            debug!(attempt, newest, "Discarding completion of a superseded attempt");
            if let Err(e) = result {
                warn!(attempt, "Superseded persistence attempt failed: {e}");
            }
            return;
        }

        match result {
            Ok(()) => {
                debug!(attempt, "Draft persisted");
                self.status.send_replace(SaveStatus::Saved {
                    attempt,
                    at: Utc::now(),
                });
                self.clear_saved_later(attempt);
            }
            Err(e) => {
                warn!(attempt, destination = self.sink.describe(), "Persisting draft failed: {e}");
                self.status.send_replace(SaveStatus::Failed {
                    attempt,
                    message: e.user_message(),
                });
            }
        }
    }

    /// Reverts `Saved` to `Idle` after the display window unless a newer
    /// attempt has changed the indicator meanwhile.
    fn clear_saved_later(self: &Arc<Self>, attempt: u64) {
        let inner = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(inner.display_window).await;
            inner.status.send_if_modified(|status| match status {
                SaveStatus::Saved { attempt: shown, .. } if *shown == attempt => {
                    *status = SaveStatus::Idle;
                    true
                }
                _ => false,
            });
        });
    }
}

impl DocumentObserver for PersistenceCoordinator {
    fn on_change(&mut self, model: &DocumentModel, _event: &ChangeEvent) {
        self.schedule(model.clone());
    }
}
