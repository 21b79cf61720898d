//! Client registry
//!
//! The process-wide table of registered clients and the four operations
//! the server exposes: register, broadcast, receive, disconnect.
//!
//! The id counter and the client map share one mutex so concurrent
//! registrations can never assign the same id. The lock is held across
//! fan-out because every push inside it is non-blocking; the only blocking
//! operation (receive) takes a mailbox reader under the lock and awaits
//! after releasing it.

use std::collections::HashMap;

use chrono::Local;
use log::{info, warn};
use tokio::sync::Mutex;

use crate::client::mailbox::PushError;
use crate::client::{Client, Mailbox};
use crate::error::RegistryError;

struct RegistryInner {
    clients: HashMap<u64, Client>,
    next_id: u64,
}

/// Registry for tracking active clients
pub struct ChatRegistry {
    inner: Mutex<RegistryInner>,
    mailbox_capacity: usize,
    max_clients: usize,
}

impl ChatRegistry {
    pub fn new(mailbox_capacity: usize, max_clients: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                clients: HashMap::new(),
                next_id: 1,
            }),
            mailbox_capacity,
            max_clients,
        }
    }

    /// Register a new client and announce the join to everyone else.
    ///
    /// Returns the assigned id. Ids are monotonically increasing and never
    /// reused for the lifetime of the process.
    pub async fn register(&self, name: &str) -> Result<u64, RegistryError> {
        let mut inner = self.inner.lock().await;

        if inner.clients.len() >= self.max_clients {
            return Err(RegistryError::ServerFull);
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let client = Client::new(id, name.to_string(), Mailbox::new(self.mailbox_capacity));
        inner.clients.insert(id, client);

        let join_msg = format!("User [{}] joined", id);
        fan_out(&inner.clients, id, &join_msg);

        info!(
            "User [{}] ({}) registered. Total clients: {}",
            id,
            name,
            inner.clients.len()
        );
        Ok(id)
    }

    /// Deliver a message from `sender_id` to every other registered client.
    ///
    /// Delivery is best-effort: a recipient whose mailbox is full misses
    /// this message, and the broadcast still succeeds.
    pub async fn broadcast(&self, sender_id: u64, content: &str) -> Result<(), RegistryError> {
        let inner = self.inner.lock().await;

        let sender = inner
            .clients
            .get(&sender_id)
            .ok_or(RegistryError::UnknownSender(sender_id))?;

        let msg = format!(
            "[{}] User [{}] ({}): {}",
            Local::now().format("%H:%M:%S"),
            sender.id(),
            sender.name(),
            content
        );

        let sent_count = fan_out(&inner.clients, sender_id, &msg);
        info!("User [{}] sent message to {} clients", sender_id, sent_count);
        Ok(())
    }

    /// Block until the next message for `id` arrives, in FIFO order.
    ///
    /// Fails with `NotFound` if `id` is not registered at call time, and
    /// with `Disconnected` if the mailbox is closed while waiting.
    pub async fn receive(&self, id: u64) -> Result<String, RegistryError> {
        let reader = {
            let inner = self.inner.lock().await;
            inner
                .clients
                .get(&id)
                .map(|client| client.mailbox().reader())
                .ok_or(RegistryError::NotFound(id))?
        };

        // Registry lock released; only the mailbox blocks here.
        reader.pop().await.ok_or(RegistryError::Disconnected(id))
    }

    /// Remove a client, close its mailbox, and announce the departure.
    ///
    /// Any receive blocked on the removed client's mailbox wakes with
    /// `Disconnected`. A second disconnect for the same id fails with
    /// `NotFound`.
    pub async fn disconnect(&self, id: u64) -> Result<(), RegistryError> {
        let mut inner = self.inner.lock().await;

        let client = inner
            .clients
            .remove(&id)
            .ok_or(RegistryError::NotFound(id))?;

        let leave_msg = format!("User [{}] left", id);
        fan_out(&inner.clients, id, &leave_msg);

        info!(
            "User [{}] ({}) disconnected. Remaining clients: {}",
            id,
            client.name(),
            inner.clients.len()
        );

        // Dropping the client drops the mailbox sender and wakes readers.
        drop(client);
        Ok(())
    }

    /// Number of currently registered clients.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.clients.len()
    }
}

/// Enqueue `msg` into every mailbox except `skip_id`'s.
///
/// Returns how many recipients the message was enqueued for. Iteration
/// order is irrelevant: delivery across different recipients is unordered.
fn fan_out(clients: &HashMap<u64, Client>, skip_id: u64, msg: &str) -> usize {
    let mut sent_count = 0;
    for (uid, client) in clients {
        if *uid == skip_id {
            continue;
        }
        match client.mailbox().try_push(msg.to_string()) {
            Ok(()) => sent_count += 1,
            Err(PushError::Full) => warn!("Mailbox full for user {}", uid),
            Err(PushError::Closed) => {}
        }
    }
    sent_count
}
