// src/crawl/tracker.rs
// =============================================================================
// Knowing when the crawl is over.
//
// The CompletionTracker counts outstanding tasks: URLs that were claimed and
// queued but whose processing has not finished. The crawl is done exactly
// when that count returns to zero.
//
// Rather than trusting every exit path of a task to remember a decrement, a
// claimed URL travels through the frontier together with a TaskGuard. The
// guard decrements when it is dropped, so success, skip, failure, and even a
// panic in the worker all count the task as finished exactly once.
//
// Rust concepts:
// - Atomics: a lock-free counter shared by every worker
// - Notify: wakes the task blocked in wait() when the count hits zero
// - Drop: code that runs when a value goes out of scope (RAII)
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::error::CrawlError;

#[derive(Debug, Default)]
pub struct CompletionTracker {
    outstanding: AtomicUsize,
    notify: Notify,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more outstanding task.
    pub fn increment(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Marks one task as finished. Fails instead of wrapping below zero.
    pub fn decrement(&self) -> Result<(), CrawlError> {
        let previous = self
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map_err(|_| CrawlError::TrackerUnderflow)?;

        if previous == 1 {
            self.notify.notify_waiters();
        }
        Ok(())
    }

    /// Registers a task and returns the guard that will finish it.
    pub fn track(self: &Arc<Self>) -> TaskGuard {
        self.increment();
        TaskGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Current number of outstanding tasks. Reading it has no side effects.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Resolves once every increment has been matched by a decrement.
    /// Resolves immediately if nothing is outstanding.
    pub async fn wait(&self) {
        loop {
            // Register interest before reading the count, so a decrement that
            // lands between the two can't be missed
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Proof that one task is outstanding. Dropping it finishes the task.
#[derive(Debug)]
pub struct TaskGuard {
    tracker: Arc<CompletionTracker>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        // Guards are only minted by track(), so this can't underflow unless
        // someone also called decrement() by hand
        if let Err(e) = self.tracker.decrement() {
            tracing::error!(error = %e, "task finished twice");
        }
    }
}
