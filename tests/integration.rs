//! End-to-end tests over the TCP line protocol.
//!
//! Each test starts a server on an ephemeral port and drives it with raw
//! JSON lines, the same way a real client does.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use rax_chat_server::Server;
use rax_chat_server::server::ServerConfig;

async fn start_test_server() -> SocketAddr {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_clients: 8,
        mailbox_capacity: 20,
    };
    let server = Server::new(&config).await;
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.start().await });
    addr
}

struct TestClient {
    reader: BufReader<TcpStream>,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        Self {
            reader: BufReader::new(stream),
        }
    }

    async fn send_line(&mut self, line: &str) {
        let payload = format!("{}\n", line);
        self.reader
            .get_mut()
            .write_all(payload.as_bytes())
            .await
            .unwrap();
        self.reader.get_mut().flush().await.unwrap();
    }

    async fn read_response(&mut self) -> Value {
        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap();
        serde_json::from_str(line.trim()).unwrap()
    }

    async fn call(&mut self, request: Value) -> Value {
        self.send_line(&request.to_string()).await;
        self.read_response().await
    }

    async fn register(&mut self, name: &str) -> u64 {
        let reply = self.call(json!({"op": "register", "name": name})).await;
        assert_eq!(reply["status"], "ok");
        reply["user_id"].as_u64().unwrap()
    }
}

#[tokio::test]
async fn alice_and_bob_end_to_end() {
    let addr = start_test_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;

    let alice_id = alice.register("Alice").await;
    let bob_id = bob.register("Bob").await;
    assert_eq!(alice_id, 1);
    assert_eq!(bob_id, 2);

    // Alice was already in when Bob joined, so she got the notice.
    let reply = alice.call(json!({"op": "receive", "user_id": alice_id})).await;
    assert_eq!(reply["message"], "User [2] joined");

    let reply = alice
        .call(json!({"op": "send", "user_id": alice_id, "content": "hi"}))
        .await;
    assert_eq!(reply["status"], "ok");

    let reply = bob.call(json!({"op": "receive", "user_id": bob_id})).await;
    let message = reply["message"].as_str().unwrap();
    assert!(message.contains("hi"));
    assert!(message.contains("Alice"));

    // Alice leaves; Bob's mailbox stays open and gets the notice.
    let reply = alice
        .call(json!({"op": "disconnect", "user_id": alice_id}))
        .await;
    assert_eq!(reply["status"], "ok");

    let reply = bob.call(json!({"op": "receive", "user_id": bob_id})).await;
    assert_eq!(reply["message"], "User [1] left");
}

#[tokio::test]
async fn unknown_ids_fail_over_the_wire() {
    let addr = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    let reply = client
        .call(json!({"op": "send", "user_id": 999, "content": "x"}))
        .await;
    assert_eq!(reply["status"], "error");
    assert!(reply["error"].as_str().unwrap().contains("999"));

    let reply = client.call(json!({"op": "receive", "user_id": 999})).await;
    assert_eq!(reply["status"], "error");

    let reply = client.call(json!({"op": "disconnect", "user_id": 999})).await;
    assert_eq!(reply["status"], "error");
}

#[tokio::test]
async fn malformed_line_keeps_connection_usable() {
    let addr = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    client.send_line("this is not json").await;
    let reply = client.read_response().await;
    assert_eq!(reply["status"], "error");

    // The connection still serves valid requests afterwards.
    let id = client.register("Alice").await;
    assert_eq!(id, 1);
}

#[tokio::test]
async fn receive_blocks_until_a_message_arrives() {
    let addr = start_test_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;

    let alice_id = alice.register("Alice").await;
    let bob_id = bob.register("Bob").await;

    // Drain Bob's join notice from Alice's mailbox.
    alice.call(json!({"op": "receive", "user_id": alice_id})).await;

    let pending = tokio::spawn(async move {
        alice
            .call(json!({"op": "receive", "user_id": alice_id}))
            .await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!pending.is_finished());

    bob.call(json!({"op": "send", "user_id": bob_id, "content": "wake up"}))
        .await;

    let reply = pending.await.unwrap();
    assert!(reply["message"].as_str().unwrap().contains("wake up"));
}

#[tokio::test]
async fn disconnect_unblocks_a_pending_receive() {
    let addr = start_test_server().await;
    let mut control = TestClient::connect(addr).await;
    let mut waiter = TestClient::connect(addr).await;

    let id = control.register("Alice").await;

    let pending = tokio::spawn(async move {
        waiter.call(json!({"op": "receive", "user_id": id})).await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let reply = control.call(json!({"op": "disconnect", "user_id": id})).await;
    assert_eq!(reply["status"], "ok");

    let reply = pending.await.unwrap();
    assert_eq!(reply["status"], "error");
    assert!(reply["error"].as_str().unwrap().contains("disconnected"));
}

#[tokio::test]
async fn registration_is_refused_when_full() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_clients: 1,
        mailbox_capacity: 20,
    };
    let server = Server::new(&config).await;
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.start().await });

    let mut client = TestClient::connect(addr).await;
    client.register("Alice").await;

    let reply = client.call(json!({"op": "register", "name": "Bob"})).await;
    assert_eq!(reply["status"], "error");
    assert!(reply["error"].as_str().unwrap().contains("full"));
}
