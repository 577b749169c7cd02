// src/crawl/frontier.rs
// =============================================================================
// The frontier: claimed URLs waiting for a worker.
//
// It's a bounded tokio mpsc channel shared by every worker. Workers are both
// the consumers (pop) and the producers (offer) of this queue, which is
// exactly the setup that can deadlock: if every worker is stuck pushing into
// a full queue, nobody is left to pop.
//
// So workers never wait on the queue they feed. offer() tries a non-blocking
// send first; when the queue is full the URL is handed to a small detached
// task that waits for room. The queue itself never grows past its capacity,
// and the workers keep draining it.
// =============================================================================

use tokio::sync::{mpsc, Mutex};
use tokio::sync::mpsc::error::TrySendError;

use super::tracker::TaskGuard;

/// A claimed URL and the guard that marks it outstanding.
#[derive(Debug)]
pub struct QueuedUrl {
    pub url: String,
    pub guard: TaskGuard,
}

#[derive(Debug)]
pub struct Frontier {
    tx: mpsc::Sender<QueuedUrl>,
    rx: Mutex<mpsc::Receiver<QueuedUrl>>,
}

impl Frontier {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Enqueues `item`, waiting for room if the queue is full.
    /// Only safe to call when something else is consuming.
    pub async fn push(&self, item: QueuedUrl) {
        // The receiver lives as long as self, so the channel can't be closed
        if let Err(mpsc::error::SendError(item)) = self.tx.send(item).await {
            tracing::warn!(url = %item.url, "frontier closed, dropping URL");
        }
    }

    /// Enqueues `item` without ever blocking the caller.
    pub fn offer(&self, item: QueuedUrl) {
        match self.tx.try_send(item) {
            Ok(()) => {}
            Err(TrySendError::Full(item)) => {
                tracing::trace!(url = %item.url, "frontier full, parking push");
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if let Err(mpsc::error::SendError(item)) = tx.send(item).await {
                        tracing::warn!(url = %item.url, "frontier closed, dropping URL");
                    }
                });
            }
            Err(TrySendError::Closed(item)) => {
                tracing::warn!(url = %item.url, "frontier closed, dropping URL");
            }
        }
    }

    /// Takes the next URL, waiting until one is available.
    pub async fn pop(&self) -> Option<QueuedUrl> {
        self.rx.lock().await.recv().await
    }

    /// URLs currently sitting in the queue.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}
