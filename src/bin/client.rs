//! RAX Chat Client - interactive terminal client
//!
//! Registers under a display name, then runs a stdin send loop. Incoming
//! messages arrive over a second connection so a blocked receive request
//! never delays outgoing sends (the protocol answers in order per
//! connection).

use std::io::{self, Write as _};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use rax_chat_server::protocol::{Request, Response};

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:42586";

/// One request/response connection to the server.
struct Connection {
    reader: BufReader<TcpStream>,
    line: String,
}

impl Connection {
    async fn dial(addr: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            reader: BufReader::new(stream),
            line: String::new(),
        })
    }

    /// Send one request and wait for its response line.
    async fn call(&mut self, request: &Request) -> io::Result<Response> {
        let mut payload = serde_json::to_string(request)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        payload.push('\n');
        self.reader.get_mut().write_all(payload.as_bytes()).await?;
        self.reader.get_mut().flush().await?;

        self.line.clear();
        let n = self.reader.read_line(&mut self.line).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "server closed the connection",
            ));
        }
        serde_json::from_str(self.line.trim())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let addr =
        std::env::var("RAX_CHAT_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string());

    if let Err(e) = run(&addr).await {
        eprintln!("Error connecting to server: {}", e);
        std::process::exit(1);
    }
}

async fn run(addr: &str) -> io::Result<()> {
    let mut conn = Connection::dial(addr).await?;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    print!("Enter your name: ");
    io::stdout().flush()?;
    let name = match stdin.next_line().await? {
        Some(line) => line.trim().to_string(),
        None => return Ok(()),
    };
    let name = if name.is_empty() {
        "Anonymous".to_string()
    } else {
        name
    };

    let user_id = match conn.call(&Request::Register { name: name.clone() }).await? {
        Response::Ok {
            user_id: Some(id), ..
        } => id,
        Response::Ok { .. } => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "register reply carried no id",
            ));
        }
        Response::Error { error } => {
            return Err(io::Error::new(io::ErrorKind::Other, error));
        }
    };

    println!("====================================");
    println!("Connected as User [{}] ({})", user_id, name);
    println!("====================================");
    println!("Type 'exit' to quit");
    println!("====================================");
    println!();

    let recv_conn = Connection::dial(addr).await?;
    tokio::spawn(receive_messages(recv_conn, user_id));

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(text) = stdin.next_line().await? else {
            break;
        };
        let text = text.trim();

        if text.is_empty() {
            continue;
        }

        if text == "exit" {
            println!("Goodbye!");
            let _ = conn.call(&Request::Disconnect { user_id }).await;
            return Ok(());
        }

        let request = Request::Send {
            user_id,
            content: text.to_string(),
        };
        match conn.call(&request).await {
            Ok(Response::Error { error }) => println!("Send failed: {}", error),
            Ok(_) => {}
            Err(e) => println!("Send failed: {}", e),
        }
    }

    Ok(())
}

/// Pulls messages in a loop and prints them above the prompt.
async fn receive_messages(mut conn: Connection, user_id: u64) {
    loop {
        match conn.call(&Request::Receive { user_id }).await {
            Ok(Response::Ok {
                message: Some(message),
                ..
            }) => {
                print!("\n{}\n> ", message);
                let _ = io::stdout().flush();
            }
            Ok(Response::Ok { .. }) => {}
            Ok(Response::Error { error }) => {
                eprintln!("\nDisconnected from server: {}", error);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("\nDisconnected from server: {}", e);
                std::process::exit(1);
            }
        }
    }
}
