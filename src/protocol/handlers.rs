//! Request handlers
//!
//! Dispatches a decoded request to the registry and shapes the outcome
//! into a response. Registry failures become error responses on the same
//! connection; nothing is retried here.

use crate::client::ChatRegistry;
use crate::protocol::{Request, Response};

/// Execute one request against the registry.
pub async fn handle_request(registry: &ChatRegistry, request: Request) -> Response {
    match request {
        Request::Register { name } => match registry.register(&name).await {
            Ok(id) => Response::registered(id),
            Err(e) => Response::error(e),
        },
        Request::Send { user_id, content } => match registry.broadcast(user_id, &content).await {
            Ok(()) => Response::ack(),
            Err(e) => Response::error(e),
        },
        Request::Receive { user_id } => match registry.receive(user_id).await {
            Ok(message) => Response::delivered(message),
            Err(e) => Response::error(e),
        },
        Request::Disconnect { user_id } => match registry.disconnect(user_id).await {
            Ok(()) => Response::ack(),
            Err(e) => Response::error(e),
        },
    }
}
