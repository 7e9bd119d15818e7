//! `EventStreamPoller`: a live, deduplicated view of one contract's events.
//!
//! # Cycle
//! Each poll runs one fetch-with-retry cycle:
//!
//! 1. query the source from the current cursor (or `start_ledger` on the
//!    very first query)
//! 2. on success, append records with unseen ids and advance the cursor
//! 3. on failure, sleep `1s, 3s, 9s` after attempts 1..=3, then record the
//!    error and switch to the degraded interval (base × 2)
//!
//! At most one cycle is in flight per poller. Scheduled ticks and
//! [`EventStreamPoller::refresh`] share the same guard, so an overlapping
//! request is a no-op rather than a queued fetch.
//!
//! # Disposal
//! [`EventStreamPoller::stop_polling`] (or dropping the handle) is terminal:
//! the timer task is aborted, and any cycle still running on another task
//! stops at its next suspension point without touching state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sorokit_core::error::{PollerError, TransportError};
use sorokit_core::event::{EventFilter, EventRecord, GetEventsRequest, RawEvent};
use sorokit_core::source::EventSource;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, PollerConfig};
use crate::retry::RetryPolicy;
use crate::state::{PollerSnapshot, PollerState};

/// Handle to a running poller. Dropping it disposes the poller.
pub struct EventStreamPoller {
    shared: Arc<Shared>,
    driver: JoinHandle<()>,
}

struct Shared {
    source: Arc<dyn EventSource>,
    config: PollerConfig,
    retry: RetryPolicy,
    state: Mutex<PollerState>,
    fetching: AtomicBool,
    disposed: AtomicBool,
    /// Deadline of the next scheduled poll; `None` when nothing is scheduled.
    timer: watch::Sender<Option<Instant>>,
    updates: broadcast::Sender<EventRecord>,
}

/// Holds the in-flight flag. Releasing it schedules the next tick.
struct FetchGuard {
    shared: Arc<Shared>,
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.shared.fetching.store(false, Ordering::Release);
        self.shared.schedule_next();
    }
}

impl EventStreamPoller {
    /// Start following `config.contract_id`.
    ///
    /// The initial fetch runs in the background; the returned receiver sees
    /// every record it appends. Must be called from within a Tokio runtime.
    /// Fails without starting anything if `config` does not validate.
    pub fn subscribe(
        source: Arc<dyn EventSource>,
        config: PollerConfig,
    ) -> Result<(Self, broadcast::Receiver<EventRecord>), ConfigError> {
        config.validate()?;
        let (updates, rx) = broadcast::channel(config.channel_capacity.max(1));
        let (timer, timer_rx) = watch::channel(None);
        let shared = Arc::new(Shared {
            retry: RetryPolicy::new(config.retry.clone()),
            source,
            config,
            state: Mutex::new(PollerState::new()),
            fetching: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            timer,
            updates,
        });

        info!(
            contract = %shared.config.contract_id,
            source = shared.source.name(),
            interval_ms = ?shared.config.poll_interval_ms,
            "Starting event poller"
        );

        // Claimed before the task starts so an immediate refresh is a no-op
        // instead of a second initial fetch.
        let initial = shared.try_claim();
        let driver = tokio::spawn(drive(Arc::clone(&shared), initial, timer_rx));
        Ok((Self { shared, driver }, rx))
    }

    /// A new receiver of appended records.
    pub fn updates(&self) -> broadcast::Receiver<EventRecord> {
        self.shared.updates.subscribe()
    }

    /// Cancel the pending tick, run one fetch cycle now, then reschedule.
    ///
    /// Returns the number of new records. If a cycle is already in flight
    /// this does nothing and returns `Ok(0)`. A cycle that exhausts its
    /// retries returns the final error after recording it.
    pub async fn refresh(&self) -> Result<usize, PollerError> {
        self.shared.ensure_live()?;
        let Some(guard) = self.shared.try_claim() else {
            debug!(contract = %self.shared.config.contract_id, "Refresh skipped: fetch in flight");
            return Ok(0);
        };
        self.shared.cancel_timer();
        self.shared.run_cycle(&guard).await
    }

    /// Dispose the poller. Idempotent.
    pub fn stop_polling(&self) {
        self.shared.dispose();
        self.driver.abort();
    }

    pub fn snapshot(&self) -> PollerSnapshot {
        let state = self.shared.state();
        state.snapshot(self.is_fetching(), self.is_disposed())
    }

    /// Held events in arrival order.
    pub fn events(&self) -> Vec<EventRecord> {
        self.snapshot().events
    }

    pub fn cursor(&self) -> Option<String> {
        self.shared.state().cursor.clone()
    }

    pub fn last_error(&self) -> Option<TransportError> {
        self.shared.state().last_error.clone()
    }

    pub fn is_recovering(&self) -> bool {
        self.shared.state().is_recovering
    }

    pub fn is_fetching(&self) -> bool {
        self.shared.fetching.load(Ordering::Acquire)
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    pub fn config(&self) -> &PollerConfig {
        &self.shared.config
    }
}

impl Drop for EventStreamPoller {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

impl std::fmt::Debug for EventStreamPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStreamPoller")
            .field("contract", &self.shared.config.contract_id)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

/// Background task: the initial fetch, then one cycle per timer deadline.
async fn drive(
    shared: Arc<Shared>,
    initial: Option<FetchGuard>,
    mut timer: watch::Receiver<Option<Instant>>,
) {
    if let Some(guard) = initial {
        let _ = shared.run_cycle(&guard).await;
    }

    loop {
        if shared.is_disposed() {
            return;
        }
        let deadline = *timer.borrow_and_update();
        tokio::select! {
            changed = timer.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            _ = wait_until(deadline) => {
                shared.cancel_timer();
                if let Some(guard) = shared.try_claim() {
                    let _ = shared.run_cycle(&guard).await;
                }
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn ensure_live(&self) -> Result<(), PollerError> {
        if self.is_disposed() {
            Err(PollerError::Disposed)
        } else {
            Ok(())
        }
    }

    fn try_claim(self: &Arc<Self>) -> Option<FetchGuard> {
        self.fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FetchGuard {
                shared: Arc::clone(self),
            })
    }

    /// Apply `f` to the state unless the poller is disposed. The disposal
    /// flag is read under the state lock, which `dispose` also takes.
    fn mutate<R>(&self, f: impl FnOnce(&mut PollerState) -> R) -> Result<R, PollerError> {
        let mut state = self.state();
        if self.is_disposed() {
            return Err(PollerError::Disposed);
        }
        Ok(f(&mut state))
    }

    fn dispose(&self) {
        let was_disposed = {
            let _state = self.state();
            self.disposed.swap(true, Ordering::AcqRel)
        };
        if !was_disposed {
            self.timer.send_replace(None);
            info!(contract = %self.config.contract_id, "Event poller disposed");
        }
    }

    fn cancel_timer(&self) {
        self.timer.send_replace(None);
    }

    fn schedule_next(&self) {
        if self.is_disposed() {
            return;
        }
        let degraded = self.state().is_recovering;
        let next = self.config.next_interval(degraded);
        self.timer.send_replace(next.map(|delay| Instant::now() + delay));
    }

    fn next_request(&self) -> GetEventsRequest {
        let cursor = self.state().cursor.clone();
        let filter = EventFilter::contract(self.config.contract_id.clone())
            .with_topics(self.config.topics.clone().unwrap_or_default());
        GetEventsRequest {
            filters: vec![filter],
            start_ledger: if cursor.is_none() {
                self.config.start_ledger
            } else {
                None
            },
            cursor,
            limit: self.config.limit,
        }
    }

    /// One fetch-with-retry cycle. The caller holds the in-flight guard.
    async fn run_cycle(&self, _guard: &FetchGuard) -> Result<usize, PollerError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let result = self.source.get_events(self.next_request()).await;
            self.ensure_live()?;

            let err = match result {
                Ok(page) => return self.apply(page.events),
                Err(e) => e,
            };

            let delay = self.retry.delay_after(attempt);
            let exhausted = !self.retry.should_retry(attempt);
            self.mutate(|s| s.record_attempt_failure(attempt))?;
            warn!(
                contract = %self.config.contract_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Event fetch failed"
            );

            tokio::time::sleep(delay).await;
            self.ensure_live()?;

            if exhausted {
                self.mutate(|s| s.record_exhausted(err.clone()))?;
                warn!(
                    contract = %self.config.contract_id,
                    attempts = attempt,
                    next_poll_ms = ?self.config.next_interval(true).map(|d: Duration| d.as_millis() as u64),
                    "Retries exhausted; polling at degraded rate"
                );
                return Err(PollerError::Transport(err));
            }
        }
    }

    fn apply(&self, page: Vec<RawEvent>) -> Result<usize, PollerError> {
        let records = page.into_iter().map(EventRecord::from);
        let (fresh, recovered, held) = self.mutate(|s| {
            let fresh = s.absorb(records, self.config.max_events);
            let recovered = s.record_success();
            (fresh, recovered, s.len())
        })?;

        if recovered {
            info!(contract = %self.config.contract_id, "Event fetch recovered");
        }
        debug!(
            contract = %self.config.contract_id,
            new = fresh.len(),
            held,
            "Event fetch complete"
        );

        let count = fresh.len();
        for record in fresh {
            if self.updates.send(record).is_err() {
                break; // no receivers
            }
        }
        Ok(count)
    }
}
