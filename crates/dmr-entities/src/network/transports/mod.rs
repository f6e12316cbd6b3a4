use std::net::SocketAddr;

pub mod udp;
#[cfg(test)]
pub(crate) mod mem;

/// Datagram transport used by the modem and network adapters.
/// Owned by a worker thread, so `receive` may block up to the transport's read timeout.
pub trait NetworkTransport: Send {
    /// Connect or reconnect the transport. Destroys any existing connection.
    fn connect(&mut self) -> Result<(), NetworkError>;

    /// Send one datagram to the configured peer
    fn send(&mut self, payload: &[u8]) -> Result<(), NetworkError>;

    /// Wait for a single datagram. Returns Ok(None) when nothing arrived within the read timeout.
    fn receive(&mut self) -> Result<Option<NetworkMessage>, NetworkError>;
}

/// Datagram received from the peer
#[derive(Debug, Clone)]
pub struct NetworkMessage {
    pub source: SocketAddr,
    pub payload: Vec<u8>,
}

/// Network-related errors
#[derive(Debug, Clone)]
pub enum NetworkError {
    ConnectionFailed(String),
    SendFailed(String),
    ReceiveFailed(String),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            NetworkError::SendFailed(msg) => write!(f, "Send failed: {}", msg),
            NetworkError::ReceiveFailed(msg) => write!(f, "Receive failed: {}", msg),
        }
    }
}

impl std::error::Error for NetworkError {}
