use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, trace, warn};

use crate::config::Config;
use crate::error::Error;
use crate::handler::Handler;
use crate::protocol::{Parser, Reply};
use crate::store::Store;

/// Where a connection is in its request/reply cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    AwaitingRequest,
    Processing,
    Replying,
}

/// Per-connection lockstep state
struct Connection {
    peer_addr: SocketAddr,
    state: ConnectionState,
}

impl Connection {
    fn new(peer_addr: SocketAddr) -> Self {
        Self {
            peer_addr,
            state: ConnectionState::AwaitingRequest,
        }
    }

    /// A new request may only start once the previous reply went out
    fn begin_request(&mut self) {
        debug_assert_eq!(self.state, ConnectionState::AwaitingRequest);
        self.transition(ConnectionState::Processing);
    }

    fn transition(&mut self, next: ConnectionState) {
        trace!(peer = %self.peer_addr, from = ?self.state, to = ?next, "connection state");
        self.state = next;
    }
}

/// TCP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    handler: Arc<Handler>,
    max_request_bytes: usize,
}

impl Server {
    /// Create and bind TCP server using the given configuration
    pub async fn bind(config: &Config) -> std::io::Result<Self> {
        let addr = config
            .socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("TCP server bound to {}", local_addr);

        let handler = Arc::new(Handler::new(Arc::new(Store::new())));

        Ok(Self {
            listener,
            local_addr,
            handler,
            max_request_bytes: config.max_request_bytes,
        })
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> &Arc<Store> {
        self.handler.store()
    }

    /// Send one reply and flush it before the next request is looked at
    async fn send_reply(
        conn: &mut Connection,
        stream: &mut TcpStream,
        reply: &Reply,
    ) -> std::io::Result<()> {
        conn.transition(ConnectionState::Replying);
        stream.write_all(&reply.encode()).await?;
        stream.flush().await?;
        conn.transition(ConnectionState::AwaitingRequest);
        Ok(())
    }

    fn oversized_reply(&self) -> Reply {
        Reply::from(Error::MalformedCommand(format!(
            "request exceeds {} bytes",
            self.max_request_bytes
        )))
    }

    /// Whether unterminated buffered bytes already exceed the limit. A
    /// trailing `\r` may belong to the delimiter and is not counted.
    fn overflows(&self, pending: &[u8]) -> bool {
        let request = pending.strip_suffix(b"\r").unwrap_or(pending);
        request.len() > self.max_request_bytes
    }

    /// Handle a single client connection
    async fn handle_connection(
        self: Arc<Self>,
        mut stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> std::io::Result<()> {
        let mut conn = Connection::new(peer_addr);
        let mut pending = BytesMut::with_capacity(8192);
        // Set while skipping the rest of an oversized request
        let mut discarding = false;

        loop {
            if discarding {
                match pending.iter().position(|&b| b == b'\n') {
                    Some(newline) => {
                        pending.advance(newline + 1);
                        discarding = false;

                        conn.begin_request();
                        let reply = self.oversized_reply();
                        if let Err(e) = Self::send_reply(&mut conn, &mut stream, &reply).await {
                            warn!("Failed to write response to {}: {}", peer_addr, e);
                            return Err(e);
                        }
                    }
                    None => pending.clear(),
                }
            }

            if !discarding {
                // Serve buffered requests strictly one at a time, in arrival order
                while let Some((request, consumed)) = Parser::parse(&pending) {
                    conn.begin_request();
                    debug!("Received request from {}: {:?}", peer_addr, String::from_utf8_lossy(request));

                    let reply = if request.len() > self.max_request_bytes {
                        self.oversized_reply()
                    } else {
                        self.handler.handle_request(request).await
                    };
                    pending.advance(consumed);

                    if let Err(e) = Self::send_reply(&mut conn, &mut stream, &reply).await {
                        warn!("Failed to write response to {}: {}", peer_addr, e);
                        return Err(e);
                    }
                }

                if self.overflows(&pending) {
                    warn!(
                        "Request from {} exceeds {} bytes, discarding until end of line",
                        peer_addr, self.max_request_bytes
                    );
                    pending.clear();
                    discarding = true;
                }
            }

            match stream.read_buf(&mut pending).await {
                Ok(0) => {
                    if !pending.is_empty() || discarding {
                        debug!("Dropping unterminated request from {}", peer_addr);
                    }
                    info!("Connection closed by client: {}", peer_addr);
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Error reading from {}: {}", peer_addr, e);
                    break;
                }
            }
        }

        info!("Connection handler ended for {}", peer_addr);
        Ok(())
    }

    /// Start server, accept and process connections
    pub async fn run(self: Arc<Self>) {
        info!("Server started, listening on {}", self.local_addr);

        loop {
            match self.listener.accept().await {
                Ok((stream, peer_addr)) => {
                    info!("New connection accepted from {}", peer_addr);

                    let server = Arc::clone(&self);

                    // Each connection keeps its own lockstep sequence
                    tokio::spawn(async move {
                        if let Err(e) = server.handle_connection(stream, peer_addr).await {
                            error!("Error handling connection from {}: {}", peer_addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    /// Run until `shutdown` resolves
    pub async fn run_until<F>(self: Arc<Self>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            _ = Arc::clone(&self).run() => {}
            _ = shutdown => {
                info!("Shutdown signal received, {} keys in store", self.store().len());
            }
        }
    }
}
