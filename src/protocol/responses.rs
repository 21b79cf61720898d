//! Response messages
//!
//! Server replies, tagged by `status` on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One server response, encoded as a single JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        user_id: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Error {
        error: String,
    },
}

impl Response {
    /// Bare acknowledgement (send, disconnect)
    pub fn ack() -> Self {
        Response::Ok {
            user_id: None,
            message: None,
        }
    }

    /// Successful registration carrying the assigned id
    pub fn registered(user_id: u64) -> Self {
        Response::Ok {
            user_id: Some(user_id),
            message: None,
        }
    }

    /// Delivered message for a receive request
    pub fn delivered(message: String) -> Self {
        Response::Ok {
            user_id: None,
            message: Some(message),
        }
    }

    pub fn error(err: impl fmt::Display) -> Self {
        Response::Error {
            error: err.to_string(),
        }
    }
}
