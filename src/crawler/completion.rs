//! Completion detection for a crawl run
//!
//! A run is finished only when no fetch is in flight *and* the frontier is
//! empty. Checking the queue alone races against a worker that is about to
//! enqueue the links it just discovered.
//!
//! Workers enqueue their discoveries before they leave the in-flight count, and
//! only the dispatcher starts new fetches. So once the dispatcher observes an
//! in-flight count of zero, every enqueue that will ever happen is already
//! visible in the frontier, and reading the frontier afterwards gives a
//! consistent answer.

use crate::crawler::frontier::Frontier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

/// Lifecycle of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Fetches are queued or in flight
    Running,
    /// Cancellation was requested; in-flight fetches are finishing
    Draining,
    /// Nothing queued, nothing in flight
    Done,
}

/// Tracks in-flight fetches and wakes the dispatcher on every state change
#[derive(Debug)]
pub struct CompletionDetector {
    in_flight: AtomicUsize,
    activity: Notify,
    phase: watch::Sender<CrawlPhase>,
}

impl Default for CompletionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionDetector {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(CrawlPhase::Running);
        Self {
            in_flight: AtomicUsize::new(0),
            activity: Notify::new(),
            phase,
        }
    }

    /// Registers a fetch that is about to start
    ///
    /// The returned guard leaves the in-flight count when dropped, so a fetch
    /// task that panics still lets the run terminate.
    pub fn task_started(self: &Arc<Self>) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            detector: Arc::clone(self),
        }
    }

    fn task_finished(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.activity.notify_one();
    }

    /// Signals that new links were added to the frontier
    pub fn work_enqueued(&self) {
        self.activity.notify_one();
    }

    /// Number of fetches currently executing
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Evaluates the termination condition
    ///
    /// The in-flight count is read first; see the module docs for why that
    /// order makes the two reads behave as one observation.
    pub fn is_drained(&self, frontier: &Frontier) -> bool {
        self.in_flight() == 0 && frontier.is_empty()
    }

    /// Waits until a fetch finishes or new work is enqueued
    ///
    /// A signal sent while nobody is waiting is kept, so a wake-up between the
    /// caller's last check and this call is never lost. Spurious wake-ups are
    /// possible; callers re-check their condition in a loop.
    pub async fn wait_for_activity(&self) {
        self.activity.notified().await;
    }

    /// Current phase of the run
    pub fn phase(&self) -> CrawlPhase {
        *self.phase.borrow()
    }

    /// Moves a running crawl into the draining phase
    pub fn begin_draining(&self) {
        self.phase.send_if_modified(|phase| {
            if *phase == CrawlPhase::Running {
                *phase = CrawlPhase::Draining;
                true
            } else {
                false
            }
        });
    }

    /// Marks the run as finished and wakes everyone waiting on it
    pub fn mark_done(&self) {
        debug_assert_eq!(self.in_flight(), 0, "run marked done with fetches in flight");
        self.phase.send_replace(CrawlPhase::Done);
    }

    /// Subscribes to phase changes
    pub fn subscribe(&self) -> watch::Receiver<CrawlPhase> {
        self.phase.subscribe()
    }

    /// Suspends until the run reaches [`CrawlPhase::Done`]
    pub async fn wait_until_done(&self) {
        let mut phases = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = phases.wait_for(|phase| *phase == CrawlPhase::Done).await;
    }
}

/// Keeps one fetch counted as in flight until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    detector: Arc<CompletionDetector>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.detector.task_finished();
    }
}
