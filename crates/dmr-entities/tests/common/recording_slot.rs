use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use dmr_core::{DmrData, SlotId};
use dmr_entities::DmrSlot;

#[derive(Debug, Clone, PartialEq)]
pub enum SlotEvent {
    Modem(Vec<u8>),
    Network(DmrData),
    Clock,
}

/// Calls of both slots in the order they happened
pub type Journal = Arc<Mutex<Vec<(SlotId, SlotEvent)>>>;

/// A slot that only records what the dispatcher does to it
pub struct RecordingSlot {
    slot: SlotId,
    journal: Journal,
    /// Frames handed out by read_modem
    pub outbound: VecDeque<Vec<u8>>,
}

impl RecordingSlot {
    pub fn new(slot: SlotId, journal: Journal) -> Self {
        Self { slot, journal, outbound: VecDeque::new() }
    }

    fn record(&self, event: SlotEvent) {
        self.journal.lock().unwrap().push((self.slot, event));
    }
}

impl DmrSlot for RecordingSlot {
    fn write_modem(&mut self, frame: &[u8]) {
        self.record(SlotEvent::Modem(frame.to_vec()));
    }

    fn read_modem(&mut self, out: &mut [u8]) -> usize {
        let Some(frame) = self.outbound.pop_front() else {
            return 0;
        };
        out[..frame.len()].copy_from_slice(&frame);
        frame.len()
    }

    fn write_network(&mut self, data: &DmrData) {
        self.record(SlotEvent::Network(data.clone()));
    }

    fn clock(&mut self) {
        self.record(SlotEvent::Clock);
    }
}
