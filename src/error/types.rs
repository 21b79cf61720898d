//! Error types
//!
//! Defines domain-specific error types for each module of the chat server.

use std::fmt;

/// Registry module errors
///
/// Every variant is reported synchronously to the caller of the failing
/// operation; none are retried internally.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Broadcast attempted from an id not present in the registry
    UnknownSender(u64),
    /// Receive or Disconnect against an id not present in the registry
    NotFound(u64),
    /// Receive unblocked by mailbox closure rather than a delivered message
    Disconnected(u64),
    /// Registration refused because the server is at max_clients
    ServerFull,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownSender(id) => write!(f, "user [{}] not registered", id),
            RegistryError::NotFound(id) => write!(f, "user [{}] not found", id),
            RegistryError::Disconnected(id) => write!(f, "user [{}] disconnected", id),
            RegistryError::ServerFull => write!(f, "server full, try again later"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Protocol module errors
#[derive(Debug)]
pub enum ProtocolError {
    MalformedRequest(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MalformedRequest(s) => write!(f, "malformed request: {}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}
