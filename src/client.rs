use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::protocol::ACK;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("connection is closed")]
    Disconnected,

    #[error("invalid key {0:?}")]
    InvalidKey(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Handle to one server connection.
///
/// Requests and replies alternate strictly. If an exchange fails or times
/// out the reply stream can no longer be matched to requests, so the handle
/// drops its connection and every later call returns
/// [`ClientError::Disconnected`].
pub struct Client {
    addr: SocketAddr,
    timeout: Duration,
    stream: Option<BufReader<TcpStream>>,
}

impl Client {
    pub async fn connect(addr: SocketAddr, timeout: Duration) -> Result<Self> {
        info!("connecting to {}", addr);
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| ClientError::Timeout(timeout))??;

        Ok(Self {
            addr,
            timeout,
            stream: Some(BufReader::new(stream)),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Store `value` under `key`, replacing any previous value
    pub async fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(ClientError::InvalidKey(key.to_string()));
        }
        let payload = serde_json::to_string(value)?;

        match self.exchange(&format!("SET {} {}", key, payload)).await? {
            Value::String(ack) if ack == ACK => Ok(()),
            other => Err(ClientError::Rejected(describe(&other))),
        }
    }

    /// Fetch the value stored under `key`; `Value::Null` when it was never set
    pub async fn get(&mut self, key: &str) -> Result<Value> {
        if key.is_empty() || key.contains(['\n', '\r']) {
            return Err(ClientError::InvalidKey(key.to_string()));
        }
        self.exchange(&format!("GET {}", key)).await
    }

    /// Shut the connection down
    pub async fn close(mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream.into_inner().shutdown().await?;
            debug!("disconnected from {}", self.addr);
        }
        Ok(())
    }

    async fn exchange(&mut self, request: &str) -> Result<Value> {
        let timeout = self.timeout;
        let stream = self.stream.as_mut().ok_or(ClientError::Disconnected)?;

        let result = match tokio::time::timeout(timeout, round_trip(stream, request)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(timeout)),
        };

        if let Err(e) = &result {
            warn!("dropping connection to {}: {}", self.addr, e);
            self.stream = None;
        }
        result
    }
}

async fn round_trip(stream: &mut BufReader<TcpStream>, request: &str) -> Result<Value> {
    let mut frame = Vec::with_capacity(request.len() + 1);
    frame.extend_from_slice(request.as_bytes());
    frame.push(b'\n');
    stream.get_mut().write_all(&frame).await?;
    stream.get_mut().flush().await?;

    let mut line = String::new();
    if stream.read_line(&mut line).await? == 0 {
        return Err(ClientError::Disconnected);
    }
    Ok(serde_json::from_str(line.trim_end())?)
}

fn describe(reply: &Value) -> String {
    match reply.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => reply.to_string(),
    }
}
