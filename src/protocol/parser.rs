//! Request parsing
//!
//! Decodes one line of client input into a `Request`.

use crate::error::ProtocolError;
use crate::protocol::Request;

/// Parse a single JSON line into a request.
pub fn parse_request(line: &str) -> Result<Request, ProtocolError> {
    serde_json::from_str(line.trim())
        .map_err(|e| ProtocolError::MalformedRequest(e.to_string()))
}
