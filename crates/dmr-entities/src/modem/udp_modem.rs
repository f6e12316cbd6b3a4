use std::collections::VecDeque;

use dmr_config::CfgModem;
use dmr_core::SlotId;
use dmr_pdus::modem::mmdvm_frame::{MmdvmCommand, MmdvmFrame};

use crate::network::transports::udp::UdpTransport;
use crate::network::transports::{NetworkError, NetworkTransport};
use crate::network::worker::{WorkerChannels, spawn_worker};

use super::DmrModem;

/// Frames waiting in the worker's send queue before we report the modem as full
const MAX_TX_BACKLOG: usize = 8;

/// MMDVM modem reached over UDP, as exposed by modem/network bridges
pub struct UdpModem {
    worker: WorkerChannels,
    rx_queues: [VecDeque<Vec<u8>>; 2],
}

impl UdpModem {
    pub fn new(cfg: &CfgModem) -> Result<Self, NetworkError> {
        let transport = UdpTransport::new(&cfg.local_addr, &cfg.remote_addr)?;
        tracing::info!("UDP modem {} -> {}", cfg.local_addr, cfg.remote_addr);
        Self::with_transport(transport)
    }

    pub fn with_transport<T: NetworkTransport + 'static>(transport: T) -> Result<Self, NetworkError> {
        let worker = spawn_worker("net-worker-modem", transport)?;
        Ok(Self {
            worker,
            rx_queues: [VecDeque::new(), VecDeque::new()],
        })
    }

    /// Moves everything the worker received into the per-slot queues
    fn poll(&mut self) {
        while let Ok(msg) = self.worker.w2e_receiver.try_recv() {
            let mut buf = msg.payload.as_slice();
            while !buf.is_empty() {
                let (frame, used) = match MmdvmFrame::decode(buf) {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::debug!("dropping modem data: {}", e);
                        break;
                    }
                };
                buf = &buf[used..];

                match frame.to_slot_frame() {
                    Some((slot, tagged)) => self.rx_queues[slot.index()].push_back(tagged),
                    None => match frame.command {
                        MmdvmCommand::Nak => tracing::warn!("modem NAK: {:02x?}", frame.payload),
                        _ => tracing::trace!("ignoring {}", frame),
                    },
                }
            }
        }
    }

    fn send(&mut self, frame: MmdvmFrame) -> bool {
        tracing::trace!("-> {}", frame);
        self.worker.e2w_sender.send(frame.encode()).is_ok()
    }
}

impl DmrModem for UdpModem {
    fn read_dmr_data(&mut self, slot: SlotId, out: &mut [u8]) -> usize {
        self.poll();
        let Some(frame) = self.rx_queues[slot.index()].pop_front() else {
            return 0;
        };
        let len = frame.len().min(out.len());
        out[..len].copy_from_slice(&frame[..len]);
        len
    }

    fn has_dmr_space(&self, _slot: SlotId) -> bool {
        self.worker.e2w_sender.len() < MAX_TX_BACKLOG
    }

    fn write_dmr_data(&mut self, slot: SlotId, frame: &[u8]) -> bool {
        match MmdvmFrame::from_slot_frame(slot, frame) {
            Some(frame) => self.send(frame),
            None => false,
        }
    }

    fn write_dmr_start(&mut self, tx: bool) -> bool {
        self.send(MmdvmFrame::dmr_start(tx))
    }

    fn write_dmr_abort(&mut self, slot: SlotId) -> bool {
        self.send(MmdvmFrame::dmr_abort(slot))
    }
}
