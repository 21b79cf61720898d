//! Wire protocol
//!
//! Newline-delimited JSON over TCP: one request per line, one response per
//! line, answered in order. Handles request parsing, dispatch, and response
//! generation.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::Request;
pub use handlers::handle_request;
pub use parser::parse_request;
pub use responses::Response;
