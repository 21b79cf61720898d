//! Per-client mailbox
//!
//! A bounded FIFO queue of pending outbound messages. Pushes never block:
//! a full mailbox drops the message for that recipient only. Pops block
//! until a message arrives or the mailbox is closed by disconnect.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Failure modes of a non-blocking push
#[derive(Debug, PartialEq, Eq)]
pub enum PushError {
    /// Mailbox at capacity; the message is dropped for this recipient
    Full,
    /// Mailbox already closed
    Closed,
}

/// Bounded per-client message queue.
///
/// The sending half lives in the registry entry; dropping the entry drops
/// the sender, which is what closes the mailbox and wakes blocked readers.
pub struct Mailbox {
    tx: mpsc::Sender<String>,
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl Mailbox {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Enqueue a message without blocking.
    pub fn try_push(&self, message: String) -> Result<(), PushError> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => PushError::Full,
            TrySendError::Closed(_) => PushError::Closed,
        })
    }

    /// Hand out a reader so the caller can block on the mailbox after
    /// releasing the registry lock.
    pub fn reader(&self) -> MailboxReader {
        MailboxReader {
            rx: Arc::clone(&self.rx),
        }
    }
}

/// Blocking read handle for a mailbox.
///
/// Concurrent readers of the same mailbox serialize on the inner lock, so
/// each queued message is delivered exactly once.
pub struct MailboxReader {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl MailboxReader {
    /// Wait for the next message in FIFO order.
    ///
    /// Returns `None` once the mailbox has been closed and drained.
    pub async fn pop(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }
}
