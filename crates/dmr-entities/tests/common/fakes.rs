use std::collections::VecDeque;

use dmr_core::{DmrData, SlotId, TrafficSource};
use dmr_entities::{DmrDisplay, DmrModem, DmrNetwork};

/// Modem with scripted receive queues that records everything sent to it
#[derive(Default)]
pub struct FakeModem {
    pub rx: [VecDeque<Vec<u8>>; 2],
    pub tx: Vec<(SlotId, Vec<u8>)>,
    pub starts: Vec<bool>,
    pub aborts: Vec<SlotId>,
}

impl FakeModem {
    pub fn push_rx(&mut self, slot: SlotId, frame: Vec<u8>) {
        self.rx[slot.index()].push_back(frame);
    }
}

impl DmrModem for FakeModem {
    fn read_dmr_data(&mut self, slot: SlotId, out: &mut [u8]) -> usize {
        let Some(frame) = self.rx[slot.index()].pop_front() else {
            return 0;
        };
        out[..frame.len()].copy_from_slice(&frame);
        frame.len()
    }

    fn has_dmr_space(&self, _slot: SlotId) -> bool {
        true
    }

    fn write_dmr_data(&mut self, slot: SlotId, frame: &[u8]) -> bool {
        self.tx.push((slot, frame.to_vec()));
        true
    }

    fn write_dmr_start(&mut self, tx: bool) -> bool {
        self.starts.push(tx);
        true
    }

    fn write_dmr_abort(&mut self, slot: SlotId) -> bool {
        self.aborts.push(slot);
        true
    }
}

/// Network fed from a queue. Counts reads so tests can tell whether it was polled.
#[derive(Default)]
pub struct FakeNetwork {
    pub inbound: VecDeque<DmrData>,
    pub written: Vec<DmrData>,
    pub reads: usize,
}

impl DmrNetwork for FakeNetwork {
    fn read(&mut self) -> Option<DmrData> {
        self.reads += 1;
        self.inbound.pop_front()
    }

    fn write(&mut self, data: &DmrData) -> bool {
        self.written.push(data.clone());
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    Write { slot: SlotId, source: TrafficSource, src: String, group: bool, dst: String },
    Clear(SlotId),
}

#[derive(Default)]
pub struct FakeDisplay {
    pub events: std::sync::Mutex<Vec<DisplayEvent>>,
}

impl FakeDisplay {
    pub fn take(&self) -> Vec<DisplayEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl DmrDisplay for FakeDisplay {
    fn write_dmr(&self, slot: SlotId, source: TrafficSource, src: &str, group: bool, dst: &str) {
        self.events.lock().unwrap().push(DisplayEvent::Write {
            slot,
            source,
            src: src.to_string(),
            group,
            dst: dst.to_string(),
        });
    }

    fn clear_dmr(&self, slot: SlotId) {
        self.events.lock().unwrap().push(DisplayEvent::Clear(slot));
    }
}
