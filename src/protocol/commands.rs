//! Request messages
//!
//! The four operations a client may invoke, tagged by `op` on the wire.

use serde::{Deserialize, Serialize};

/// One client request, decoded from a single JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Join the chat under a display name
    Register { name: String },
    /// Broadcast a message to every other client
    Send { user_id: u64, content: String },
    /// Block until the next message for this client arrives
    Receive { user_id: u64 },
    /// Leave the chat and close the mailbox
    Disconnect { user_id: u64 },
}
