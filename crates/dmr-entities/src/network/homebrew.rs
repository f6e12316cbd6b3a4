//! DMRD exchange with a Homebrew protocol master

use dmr_config::CfgNetwork;
use dmr_core::{DmrData, DmrId};
use dmr_pdus::network::dmrd::{self, DMRD_MAGIC};

use super::DmrNetwork;
use super::transports::NetworkError;
use super::transports::NetworkTransport;
use super::transports::udp::UdpTransport;
use super::worker::{WorkerChannels, spawn_worker};

/// Network adapter carrying DMRD packets over UDP. Login and keep-alive are
/// handled by the master's side of the link, so only DMRD is interpreted here.
pub struct HomebrewNetwork {
    repeater_id: DmrId,
    worker: WorkerChannels,
}

impl HomebrewNetwork {
    pub fn new(repeater_id: DmrId, cfg: &CfgNetwork) -> Result<Self, NetworkError> {
        let transport = UdpTransport::new(&cfg.local_addr, &cfg.remote_addr)?;
        tracing::info!("Homebrew network {} -> {}", cfg.local_addr, cfg.remote_addr);
        Self::with_transport(repeater_id, transport)
    }

    pub fn with_transport<T: NetworkTransport + 'static>(repeater_id: DmrId, transport: T) -> Result<Self, NetworkError> {
        let worker = spawn_worker("net-worker-homebrew", transport)?;
        Ok(Self { repeater_id, worker })
    }
}

impl DmrNetwork for HomebrewNetwork {
    fn read(&mut self) -> Option<DmrData> {
        while let Ok(msg) = self.worker.w2e_receiver.try_recv() {
            if !msg.payload.starts_with(DMRD_MAGIC) {
                tracing::trace!("ignoring {} byte packet from {}", msg.payload.len(), msg.source);
                continue;
            }

            match dmrd::decode(&msg.payload) {
                Ok((data, repeater_id)) if repeater_id == self.repeater_id => {
                    tracing::trace!("<- {}", data);
                    return Some(data);
                }
                Ok((_, repeater_id)) => {
                    tracing::debug!("DMRD for repeater {} ignored", repeater_id);
                }
                Err(e) => {
                    tracing::debug!("bad DMRD from {}: {}", msg.source, e);
                }
            }
        }
        None
    }

    fn write(&mut self, data: &DmrData) -> bool {
        tracing::trace!("-> {}", data);
        let packet = dmrd::encode(data, self.repeater_id);
        self.worker.e2w_sender.send(packet.to_vec()).is_ok()
    }
}
