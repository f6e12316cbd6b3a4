use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use super::{NetworkError, NetworkMessage, NetworkTransport};

/// Blocking receive is bounded so the worker can notice its entity going away
const UDP_READ_TIMEOUT: Duration = Duration::from_millis(20);

/// UDP-based network transport
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    remote_addr: SocketAddr,
    bind_addr: String,
}

impl UdpTransport {
    pub fn new(bind_addr: &str, remote_addr: &str) -> Result<Self, NetworkError> {
        let remote_addr = remote_addr
            .to_socket_addrs()
            .map_err(|e| NetworkError::ConnectionFailed(format!("cannot resolve {}: {}", remote_addr, e)))?
            .next()
            .ok_or_else(|| NetworkError::ConnectionFailed(format!("no address for {}", remote_addr)))?;

        Ok(Self {
            socket: None,
            remote_addr,
            bind_addr: bind_addr.to_string(),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    fn ensure_connected(&mut self) -> Result<&UdpSocket, NetworkError> {
        if self.socket.is_none() {
            self.connect()?;
        }
        self.socket
            .as_ref()
            .ok_or_else(|| NetworkError::ConnectionFailed("No active socket".to_string()))
    }
}

impl NetworkTransport for UdpTransport {
    fn connect(&mut self) -> Result<(), NetworkError> {
        match UdpSocket::bind(&self.bind_addr) {
            Ok(socket) => {
                socket
                    .set_read_timeout(Some(UDP_READ_TIMEOUT))
                    .map_err(|e| NetworkError::ConnectionFailed(format!("Failed to set timeout: {}", e)))?;

                self.socket = Some(socket);
                Ok(())
            }
            Err(e) => Err(NetworkError::ConnectionFailed(format!("UDP bind {} failed: {}", self.bind_addr, e))),
        }
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), NetworkError> {
        let remote = self.remote_addr;
        let socket = self.ensure_connected()?;
        socket
            .send_to(payload, remote)
            .map_err(|e| NetworkError::SendFailed(format!("UDP send failed: {}", e)))?;
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<NetworkMessage>, NetworkError> {
        let socket = self.ensure_connected()?;

        let mut buffer = vec![0u8; 65536]; // Max UDP packet size
        match socket.recv_from(&mut buffer) {
            Ok((len, source)) => {
                buffer.truncate(len);
                Ok(Some(NetworkMessage { source, payload: buffer }))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(NetworkError::ReceiveFailed(e.to_string())),
        }
    }
}
