// Hourly refresh scheduler.
//
// One spawned loop task per run: fetch immediately, sleep until the next
// top of the hour, fetch, then fetch every hour. Manual refreshes are fed
// into the same loop so a scheduled and a manual fetch never overlap.
// `stop`, `reconfigure` and `Drop` abort the loop task, which cancels the
// pending one-shot timer and the repeating interval together.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{NaiveDateTime, Timelike};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::client::{DataSource, FetchError, LineupSource};
use crate::projection::PlayerProjection;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Period of the repeating refresh once aligned to the hour.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(3_600_000);

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of local wall-clock time for top-of-hour alignment.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Time from `now` until the next top of the hour, at whole-second
/// resolution: `(60 - minute) * 60_000 - second * 1_000` ms.
///
/// Exactly on the hour this is a full hour, never zero.
pub fn delay_until_next_hour<T: Timelike>(now: &T) -> Duration {
    let minute = u64::from(now.minute().min(59));
    let second = u64::from(now.second().min(59));
    Duration::from_millis((60 - minute) * 60_000 - second * 1_000)
}

// ---------------------------------------------------------------------------
// Events and phases
// ---------------------------------------------------------------------------

/// Scheduler lifecycle, observable through `RefreshScheduler::phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Not running.
    Idle,
    /// Waiting on the next timer.
    Scheduled,
    /// A fetch is in flight.
    Fetching,
}

/// Emitted for every fetch the scheduler performs.
#[derive(Debug)]
pub enum RefreshEvent {
    Started {
        seq: u64,
        source: DataSource,
    },
    Finished {
        seq: u64,
        source: DataSource,
        /// Local wall-clock time the response arrived.
        at: NaiveDateTime,
        result: Result<Vec<PlayerProjection>, FetchError>,
    },
}

impl RefreshEvent {
    pub fn seq(&self) -> u64 {
        match self {
            RefreshEvent::Started { seq, .. } | RefreshEvent::Finished { seq, .. } => *seq,
        }
    }

    pub fn source(&self) -> DataSource {
        match self {
            RefreshEvent::Started { source, .. } | RefreshEvent::Finished { source, .. } => *source,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared state between the handle and its loop task
// ---------------------------------------------------------------------------

/// Bumped on every stop/restart. A loop task only acts while its own
/// generation is current, so a task that is mid-poll when it gets aborted
/// cannot publish a phase or claim a sequence number afterwards.
#[derive(Debug, Default)]
struct Shared {
    generation: u64,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct LoopContext {
    generation: u64,
    source: DataSource,
    lineups: Arc<dyn LineupSource>,
    clock: Arc<dyn Clock>,
    events: mpsc::Sender<RefreshEvent>,
    shared: Arc<Mutex<Shared>>,
    next_seq: Arc<AtomicU64>,
    phase: Arc<watch::Sender<SchedulerPhase>>,
}

impl LoopContext {
    fn is_current(&self) -> bool {
        lock(&self.shared).generation == self.generation
    }

    fn set_phase(&self, next: SchedulerPhase) {
        self.phase.send_if_modified(|phase| {
            if !self.is_current() || *phase == next {
                return false;
            }
            *phase = next;
            true
        });
    }

    /// Claim the next sequence number, unless this loop has been retired.
    fn claim_seq(&self) -> Option<u64> {
        let guard = lock(&self.shared);
        if guard.generation != self.generation {
            return None;
        }
        Some(self.next_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Perform one fetch and report it. Returns `false` once the event
    /// receiver is gone or this loop has been retired.
    async fn fetch(&self) -> bool {
        let Some(seq) = self.claim_seq() else {
            return false;
        };
        self.set_phase(SchedulerPhase::Fetching);

        let started = RefreshEvent::Started {
            seq,
            source: self.source,
        };
        if self.events.send(started).await.is_err() {
            return false;
        }

        let result = self.lineups.fetch_lineups(self.source).await;
        match &result {
            Ok(records) => info!(seq, source = ?self.source, "fetched {} lineup records", records.len()),
            Err(e) => warn!(seq, source = ?self.source, network = e.is_network(), "lineup fetch failed: {e}"),
        }

        let finished = RefreshEvent::Finished {
            seq,
            source: self.source,
            at: self.clock.now(),
            result,
        };
        self.events.send(finished).await.is_ok()
    }
}

async fn run_loop(ctx: LoopContext, mut manual_rx: mpsc::Receiver<()>) {
    if !ctx.fetch().await {
        return;
    }

    let delay = delay_until_next_hour(&ctx.clock.now());
    debug!(delay_ms = delay.as_millis() as u64, "next refresh aligned to top of hour");
    ctx.set_phase(SchedulerPhase::Scheduled);

    let first_tick = tokio::time::sleep(delay);
    tokio::pin!(first_tick);
    // The hourly cadence is anchored here, not at the end of the fetch.
    let top_of_hour = first_tick.deadline();
    loop {
        tokio::select! {
            _ = &mut first_tick => break,
            Some(()) = manual_rx.recv() => {
                if !ctx.fetch().await {
                    return;
                }
                ctx.set_phase(SchedulerPhase::Scheduled);
            }
        }
    }

    if !ctx.fetch().await {
        return;
    }
    ctx.set_phase(SchedulerPhase::Scheduled);

    let mut hourly = tokio::time::interval_at(top_of_hour + REFRESH_INTERVAL, REFRESH_INTERVAL);
    hourly.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = hourly.tick() => {
                debug!("hourly refresh tick");
            }
            Some(()) = manual_rx.recv() => {
                debug!("manual refresh");
            }
        }
        if !ctx.fetch().await {
            return;
        }
        ctx.set_phase(SchedulerPhase::Scheduled);
    }
}

// ---------------------------------------------------------------------------
// RefreshScheduler
// ---------------------------------------------------------------------------

/// Handle owning the refresh loop. At most one loop runs per handle.
pub struct RefreshScheduler {
    lineups: Arc<dyn LineupSource>,
    clock: Arc<dyn Clock>,
    events: mpsc::Sender<RefreshEvent>,
    shared: Arc<Mutex<Shared>>,
    /// Monotonic across restarts so sequence numbers never repeat.
    next_seq: Arc<AtomicU64>,
    phase: Arc<watch::Sender<SchedulerPhase>>,
    data_source: DataSource,
    manual_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new(
        lineups: Arc<dyn LineupSource>,
        clock: Arc<dyn Clock>,
        events: mpsc::Sender<RefreshEvent>,
    ) -> Self {
        let (phase, _) = watch::channel(SchedulerPhase::Idle);
        Self {
            lineups,
            clock,
            events,
            shared: Arc::new(Mutex::new(Shared::default())),
            next_seq: Arc::new(AtomicU64::new(0)),
            phase: Arc::new(phase),
            data_source: DataSource::default(),
            manual_tx: None,
            task: None,
        }
    }

    /// Subscribe to phase changes.
    pub fn phase(&self) -> watch::Receiver<SchedulerPhase> {
        self.phase.subscribe()
    }

    pub fn current_phase(&self) -> SchedulerPhase {
        *self.phase.borrow()
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Start refreshing `data_source`. Any running loop is cancelled first;
    /// the new loop fetches immediately. Must be called inside a tokio
    /// runtime.
    ///
    /// Returns the lowest sequence number the new loop can emit. Every
    /// number below it belongs to a retired loop.
    pub fn start(&mut self, data_source: DataSource) -> u64 {
        self.stop();
        self.data_source = data_source;

        // Retired loops claim under the same lock, so none can claim past
        // this point.
        let (generation, min_seq) = {
            let guard = lock(&self.shared);
            (guard.generation, self.next_seq.load(Ordering::SeqCst) + 1)
        };
        let (manual_tx, manual_rx) = mpsc::channel(1);
        let ctx = LoopContext {
            generation,
            source: data_source,
            lineups: Arc::clone(&self.lineups),
            clock: Arc::clone(&self.clock),
            events: self.events.clone(),
            shared: Arc::clone(&self.shared),
            next_seq: Arc::clone(&self.next_seq),
            phase: Arc::clone(&self.phase),
        };

        self.manual_tx = Some(manual_tx);
        self.task = Some(tokio::spawn(run_loop(ctx, manual_rx)));
        info!(source = ?data_source, min_seq, "refresh scheduler started");
        min_seq
    }

    /// Switch datasets: cancels the pending one-shot and the hourly interval,
    /// then performs exactly one immediate fetch against the new source and
    /// re-aligns to the hour. Returns the new loop's first sequence number.
    pub fn reconfigure(&mut self, data_source: DataSource) -> u64 {
        info!(from = ?self.data_source, to = ?data_source, "reconfiguring refresh scheduler");
        self.start(data_source)
    }

    /// Ask the running loop for an immediate fetch. Presses made while one
    /// is already queued are coalesced. Returns `false` when not running.
    pub fn refresh_now(&self) -> bool {
        match &self.manual_tx {
            Some(tx) => match tx.try_send(()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(())) => {
                    debug!("manual refresh already queued");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(())) => false,
            },
            None => false,
        }
    }

    /// Cancel every outstanding timer and return to `Idle`.
    pub fn stop(&mut self) {
        lock(&self.shared).generation += 1;
        self.manual_tx = None;
        if let Some(handle) = self.task.take() {
            handle.abort();
            info!("refresh scheduler stopped");
        }
        self.phase.send_replace(SchedulerPhase::Idle);
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
