use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use super::transports::{NetworkError, NetworkMessage, NetworkTransport};

/// Handles to a running datagram worker. Dropping it stops the worker.
pub struct WorkerChannels {
    /// Sender to worker thread
    pub e2w_sender: Sender<Vec<u8>>,
    /// Receiver from worker thread
    pub w2e_receiver: Receiver<NetworkMessage>,
}

/// Moves a connected transport to its own thread. Received datagrams are queued
/// for the owner, which drains them with `try_recv` from the frame loop.
pub fn spawn_worker<T: NetworkTransport + 'static>(name: &str, mut transport: T) -> Result<WorkerChannels, NetworkError> {
    transport.connect()?;

    let (e2w_sender, e2w_receiver) = unbounded::<Vec<u8>>();
    let (w2e_sender, w2e_receiver) = unbounded::<NetworkMessage>();

    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || run(transport, w2e_sender, e2w_receiver))
        .map_err(|e| NetworkError::ConnectionFailed(format!("Failed to spawn worker thread: {}", e)))?;

    Ok(WorkerChannels { e2w_sender, w2e_receiver })
}

fn run<T: NetworkTransport>(mut transport: T, w2e_sender: Sender<NetworkMessage>, e2w_receiver: Receiver<Vec<u8>>) {
    loop {
        loop {
            match e2w_receiver.try_recv() {
                Ok(payload) => {
                    if let Err(e) = transport.send(&payload) {
                        tracing::warn!("{}", e);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("worker owner gone, stopping");
                    return;
                }
            }
        }

        match transport.receive() {
            Ok(Some(msg)) => {
                if w2e_sender.send(msg).is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("{}, reconnecting", e);
                if let Err(e) = transport.connect() {
                    tracing::error!("{}", e);
                    thread::sleep(std::time::Duration::from_secs(1));
                }
            }
        }
    }
}
