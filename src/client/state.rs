//! Module `state`
//!
//! Defines the `Client` struct representing one registered chat participant:
//! its process-unique id, display name, and mailbox.

use crate::client::Mailbox;

/// A registered chat client.
///
/// Lives only inside the registry; removing it from the registry drops the
/// mailbox sender, which closes the mailbox.
pub struct Client {
    id: u64,
    name: String,
    mailbox: Mailbox,
}

impl Client {
    pub fn new(id: u64, name: String, mailbox: Mailbox) -> Self {
        Self { id, name, mailbox }
    }

    /// Process-unique id, never reused while the server runs.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name supplied at registration; not required to be unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }
}
