//! Client management system
//!
//! Handles client state, per-client mailboxes, and the registry that
//! tracks every connected client.

pub mod mailbox;
pub mod registry;
pub mod state;

pub use mailbox::{Mailbox, MailboxReader, PushError};
pub use registry::ChatRegistry;
pub use state::Client;
