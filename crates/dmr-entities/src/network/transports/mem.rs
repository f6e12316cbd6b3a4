use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};

use super::{NetworkError, NetworkMessage, NetworkTransport};

pub(crate) type SentLog = Arc<Mutex<Vec<Vec<u8>>>>;

/// In-memory transport: datagrams pushed into the returned sender are received from `peer`,
/// sent ones are recorded
pub(crate) struct MemTransport {
    peer: SocketAddr,
    inbound: Receiver<Vec<u8>>,
    sent: SentLog,
}

impl MemTransport {
    pub(crate) fn new(peer: SocketAddr) -> (Self, Sender<Vec<u8>>, SentLog) {
        let (tx, rx) = unbounded();
        let sent = SentLog::default();
        (MemTransport { peer, inbound: rx, sent: sent.clone() }, tx, sent)
    }
}

impl NetworkTransport for MemTransport {
    fn connect(&mut self) -> Result<(), NetworkError> {
        Ok(())
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), NetworkError> {
        self.sent.lock().unwrap().push(payload.to_vec());
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<NetworkMessage>, NetworkError> {
        Ok(self
            .inbound
            .recv_timeout(Duration::from_millis(5))
            .ok()
            .map(|payload| NetworkMessage { source: self.peer, payload }))
    }
}
