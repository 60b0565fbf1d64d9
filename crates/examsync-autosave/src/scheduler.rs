//! Per-attempt debounced autosave.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use examsync_core::traits::SectionResolver;

use crate::payload::{build_payload, wall_clock_revision};
use crate::transport::SaveTransport;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(2000);

struct PendingSave {
    generation: u64,
    timer: JoinHandle<()>,
}

type PendingMap = Arc<Mutex<HashMap<String, PendingSave>>>;

/// Issues client revisions that strictly increase, even when the wall clock
/// stalls or steps backwards.
#[derive(Debug, Default)]
struct RevisionClock {
    last: AtomicI64,
}

impl RevisionClock {
    fn next(&self) -> i64 {
        let now = wall_clock_revision();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Coalesces answer snapshots per attempt and saves the latest one after a
/// quiet period.
///
/// Each attempt id owns at most one pending timer. Scheduling again before
/// it fires replaces both the timer and the snapshot; earlier snapshots are
/// discarded, never merged. A save that has already started is not
/// interrupted by later scheduling. Save failures are logged and dropped.
///
/// Must be used from within a tokio runtime. Dropping the scheduler cancels
/// every pending timer.
pub struct AutoSaveScheduler {
    transport: Arc<dyn SaveTransport>,
    quiet_period: Duration,
    pending: PendingMap,
    generation: AtomicU64,
    clock: Arc<RevisionClock>,
}

impl AutoSaveScheduler {
    pub fn new(transport: Arc<dyn SaveTransport>) -> Self {
        Self::with_quiet_period(transport, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(transport: Arc<dyn SaveTransport>, quiet_period: Duration) -> Self {
        Self {
            transport,
            quiet_period,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
            clock: Arc::new(RevisionClock::default()),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Replace any pending save for `attempt_id` with one for `answers`.
    ///
    /// `answers` maps question id to wire value and is sent as-is once the
    /// quiet period passes without another call for the same attempt.
    pub fn schedule(
        &self,
        attempt_id: &str,
        answers: BTreeMap<String, String>,
        resolver: Arc<dyn SectionResolver>,
    ) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let attempt = attempt_id.to_string();
        let pending = Arc::clone(&self.pending);
        let transport = Arc::clone(&self.transport);
        let clock = Arc::clone(&self.clock);
        let quiet_period = self.quiet_period;

        let mut map = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = map.remove(attempt_id) {
            previous.timer.abort();
            debug!(attempt = %attempt_id, "superseded pending autosave");
        }

        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;

            {
                let mut map = pending.lock().unwrap_or_else(PoisonError::into_inner);
                if map.get(&attempt).map(|p| p.generation) != Some(generation) {
                    return;
                }
                map.remove(&attempt);
            }

            let payload = build_payload(&answers, resolver.as_ref(), clock.next());
            // Detached so that a later schedule cannot abort a save in flight.
            tokio::spawn(async move {
                match transport.save(&attempt, &payload).await {
                    Ok(()) => info!(
                        attempt = %attempt,
                        answers = payload.answers.len(),
                        revision = payload.client_revision,
                        transport = transport.name(),
                        "autosaved"
                    ),
                    Err(e) => warn!(
                        attempt = %attempt,
                        revision = payload.client_revision,
                        permanent = e.is_permanent(),
                        error = %e,
                        "autosave failed"
                    ),
                }
            });
        });

        map.insert(attempt_id.to_string(), PendingSave { generation, timer });
    }

    /// Drop the pending save for `attempt_id`, if any. Returns whether one was pending.
    pub fn cancel(&self, attempt_id: &str) -> bool {
        let removed = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(attempt_id);
        match removed {
            Some(save) => {
                save.timer.abort();
                debug!(attempt = %attempt_id, "cancelled pending autosave");
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let mut map = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, save) in map.drain() {
            save.timer.abort();
        }
    }

    /// Whether a timer is pending for `attempt_id`.
    pub fn is_pending(&self, attempt_id: &str) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(attempt_id)
    }

    /// Attempt ids with a pending timer, sorted.
    pub fn pending(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

impl Drop for AutoSaveScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl std::fmt::Debug for AutoSaveScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaveScheduler")
            .field("transport", &self.transport.name())
            .field("quiet_period", &self.quiet_period)
            .field("pending", &self.pending())
            .finish()
    }
}
