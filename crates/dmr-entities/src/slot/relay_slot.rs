//! Minimal slot: repeats RF traffic, relays network traffic through a jitter buffer

use std::collections::VecDeque;
use std::sync::Arc;

use dmr_core::{
    DMR_MODEM_FRAME_LENGTH, DMR_MODEM_FRAME_LENGTH_RSSI, DMR_IDLE_RX, DMR_SYNC_AUDIO, DMR_SYNC_DATA, DT_CSBK, DT_MASK,
    DT_TERMINATOR_WITH_LC, DT_VOICE, DT_VOICE_LC_HEADER, DT_VOICE_SYNC, DmrData, DmrId, Flco, SlotId, TAG_DATA, TAG_LOST,
    TrafficSource,
};
use dmr_pdus::csbk::Csbk;
use dmr_pdus::lc::FullLc;

use crate::lock;

use super::{DmrSlot, SlotContext};

/// Ticks without a network frame before an unterminated network stream is dropped
const NET_STREAM_TIMEOUT_TICKS: u32 = 25;

/// One call passing through the slot
#[derive(Debug, Clone, Copy)]
struct Stream {
    src_id: DmrId,
    dst_id: DmrId,
    group: bool,
    stream_id: u32,
    frames: u32,
    seq_no: u8,
    rssi_sum: i64,
    rssi_count: u32,
}

impl Stream {
    fn new(src_id: DmrId, dst_id: DmrId, group: bool, stream_id: u32) -> Self {
        Self { src_id, dst_id, group, stream_id, frames: 0, seq_no: 0, rssi_sum: 0, rssi_count: 0 }
    }
}

#[derive(Debug, Clone, Copy)]
enum RfState {
    Idle,
    Active(Stream),
    /// Denied by the access policy; the rest of the transmission is dropped
    Rejected,
}

#[derive(Debug, Clone, Copy)]
enum NetState {
    Idle,
    Active(Stream),
    Rejected(u32),
}

pub struct RelaySlot {
    slot: SlotId,
    ctx: Arc<SlotContext>,

    rf: RfState,
    net: NetState,

    /// Frames ready to go out over the air
    tx_queue: VecDeque<Vec<u8>>,
    /// Network frames held back to absorb arrival jitter
    jitter: VecDeque<Vec<u8>>,
    /// Set once the jitter buffer filled up, cleared when it runs dry
    releasing: bool,
    net_idle_ticks: u32,
    next_stream_id: u32,
}

impl RelaySlot {
    pub fn new(slot: SlotId, ctx: Arc<SlotContext>) -> Self {
        let next_stream_id = ctx.config.id.rotate_left(8) ^ slot.into_raw() as u32;
        Self {
            slot,
            ctx,
            rf: RfState::Idle,
            net: NetState::Idle,
            tx_queue: VecDeque::new(),
            jitter: VecDeque::new(),
            releasing: false,
            net_idle_ticks: 0,
            next_stream_id,
        }
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn is_rf_active(&self) -> bool {
        matches!(self.rf, RfState::Active(_))
    }

    pub fn is_net_active(&self) -> bool {
        matches!(self.net, NetState::Active(_))
    }

    /// Network frames currently held in the jitter buffer
    pub fn jitter_len(&self) -> usize {
        self.jitter.len()
    }

    fn describe(&self, src_id: DmrId, group: bool, dst_id: DmrId) -> String {
        format!(
            "{} to {}{}",
            self.ctx.lookup.find(src_id),
            if group { "TG " } else { "" },
            self.ctx.lookup.find(dst_id)
        )
    }

    fn repeat(&mut self, flags: u8, burst: &[u8]) {
        if !self.ctx.config.duplex {
            return;
        }
        let mut frame = Vec::with_capacity(DMR_MODEM_FRAME_LENGTH);
        frame.push(TAG_DATA);
        frame.push(flags & !DMR_IDLE_RX);
        frame.extend_from_slice(burst);
        self.tx_queue.push_back(frame);
    }

    /// Sends a burst of the active RF stream to the network
    fn forward(&mut self, data_type: u8, n: u8, burst: &[u8]) {
        let RfState::Active(stream) = &mut self.rf else {
            return;
        };
        stream.frames += 1;

        let Some(network) = &self.ctx.network else {
            return;
        };

        let mut data = DmrData {
            slot_no: self.slot.into_raw(),
            src_id: stream.src_id,
            dst_id: stream.dst_id,
            flco: if stream.group { Flco::Group } else { Flco::UserUser },
            data_type,
            seq_no: stream.seq_no,
            n,
            stream_id: stream.stream_id,
            ..Default::default()
        };
        data.data.copy_from_slice(burst);
        stream.seq_no = stream.seq_no.wrapping_add(1);

        if !lock(network).write(&data) {
            tracing::debug!(slot = %self.slot, "network did not take RF frame");
        }
    }

    fn rf_voice_header(&mut self, flags: u8, burst: &[u8]) {
        let lc = match FullLc::from_burst(burst) {
            Ok(lc) => lc,
            Err(e) => {
                tracing::debug!(slot = %self.slot, "RF voice header not decodable: {}", e);
                return;
            }
        };

        // Headers are sent several times at the start of a call
        if let RfState::Active(s) = self.rf {
            if s.src_id == lc.src_id && s.dst_id == lc.dst_id {
                self.repeat(flags, burst);
                self.forward(DT_VOICE_LC_HEADER, 0, burst);
                return;
            }
        }

        if self.is_net_active() {
            tracing::debug!(slot = %self.slot, "network traffic active, RF voice header from {} ignored", lc.src_id);
            return;
        }

        let access = &self.ctx.access;
        if !access.validate_src_id(lc.src_id)
            || !access.validate_tg_id(self.slot, TrafficSource::Rf, lc.is_group(), lc.dst_id)
        {
            tracing::warn!(slot = %self.slot, "RF voice header from {} rejected", self.describe(lc.src_id, lc.is_group(), lc.dst_id));
            self.rf = RfState::Rejected;
            lock(&self.ctx.modem).write_dmr_abort(self.slot);
            return;
        }

        self.next_stream_id = self.next_stream_id.wrapping_add(1);
        let stream = Stream::new(lc.src_id, lc.dst_id, lc.is_group(), self.next_stream_id);
        tracing::info!(slot = %self.slot, "RF voice header from {}", self.describe(lc.src_id, lc.is_group(), lc.dst_id));
        self.ctx.display.write_dmr(
            self.slot,
            TrafficSource::Rf,
            &self.ctx.lookup.find(lc.src_id),
            lc.is_group(),
            &self.ctx.lookup.find(lc.dst_id),
        );
        self.rf = RfState::Active(stream);

        self.repeat(flags, burst);
        self.forward(DT_VOICE_LC_HEADER, 0, burst);
    }

    fn rf_terminator(&mut self, flags: u8, burst: &[u8]) {
        match self.rf {
            RfState::Active(_) => {
                self.repeat(flags, burst);
                self.forward(DT_TERMINATOR_WITH_LC, 0, burst);
                self.end_rf("end of voice transmission");
            }
            RfState::Rejected => self.rf = RfState::Idle,
            RfState::Idle => {}
        }
    }

    fn rf_csbk(&mut self, flags: u8, burst: &[u8]) {
        let csbk = match Csbk::from_burst(burst) {
            Ok(csbk) => csbk,
            Err(e) => {
                tracing::debug!(slot = %self.slot, "RF CSBK not decodable: {}", e);
                return;
            }
        };
        tracing::debug!(slot = %self.slot, "RF {}", csbk);

        if self.ctx.access.validate_src_id(csbk.src_id) {
            self.repeat(flags, burst);
        }
    }

    fn end_rf(&mut self, reason: &str) {
        if let RfState::Active(s) = self.rf {
            if s.rssi_count > 0 {
                tracing::info!(
                    slot = %self.slot,
                    "RF {} from {}, {} frames, RSSI {} dBm",
                    reason,
                    self.ctx.lookup.find(s.src_id),
                    s.frames,
                    s.rssi_sum / s.rssi_count as i64
                );
            } else {
                tracing::info!(slot = %self.slot, "RF {} from {}, {} frames", reason, self.ctx.lookup.find(s.src_id), s.frames);
            }
            self.ctx.display.clear_dmr(self.slot);
        }
        self.rf = RfState::Idle;
    }

    fn end_net(&mut self, reason: &str) {
        if let NetState::Active(s) = self.net {
            tracing::info!(slot = %self.slot, "Net {} from {}, {} frames", reason, self.ctx.lookup.find(s.src_id), s.frames);
            self.ctx.display.clear_dmr(self.slot);
        }
        self.net = NetState::Idle;
        self.releasing = true;
    }
}

impl DmrSlot for RelaySlot {
    fn write_modem(&mut self, frame: &[u8]) {
        match frame.first() {
            Some(&TAG_LOST) => {
                self.end_rf("transmission lost");
                return;
            }
            Some(&TAG_DATA) if frame.len() >= DMR_MODEM_FRAME_LENGTH => {}
            _ => return,
        }

        let flags = frame[1];
        let burst = &frame[2..DMR_MODEM_FRAME_LENGTH];

        if frame.len() >= DMR_MODEM_FRAME_LENGTH_RSSI {
            let raw = u16::from_be_bytes([frame[DMR_MODEM_FRAME_LENGTH], frame[DMR_MODEM_FRAME_LENGTH + 1]]);
            let dbm = self.ctx.config.rssi.to_dbm(raw);
            tracing::trace!(slot = %self.slot, "RSSI raw {} -> {} dBm", raw, dbm);
            if let RfState::Active(s) = &mut self.rf {
                s.rssi_sum += dbm as i64;
                s.rssi_count += 1;
            }
        }

        if flags & DMR_SYNC_DATA != 0 {
            match flags & DT_MASK {
                DT_VOICE_LC_HEADER => self.rf_voice_header(flags, burst),
                DT_TERMINATOR_WITH_LC => self.rf_terminator(flags, burst),
                DT_CSBK => self.rf_csbk(flags, burst),
                dt => {
                    if self.is_rf_active() {
                        self.repeat(flags, burst);
                        self.forward(dt, 0, burst);
                    }
                }
            }
        } else if self.is_rf_active() {
            // Voice: sync burst A, then B-F carry their sequence number in the flag byte
            let (data_type, n) = if flags & DMR_SYNC_AUDIO != 0 { (DT_VOICE_SYNC, 0) } else { (DT_VOICE, flags & DT_MASK) };
            self.repeat(flags, burst);
            self.forward(data_type, n, burst);
        }
    }

    fn read_modem(&mut self, out: &mut [u8]) -> usize {
        let Some(frame) = self.tx_queue.pop_front() else {
            return 0;
        };
        let len = frame.len().min(out.len());
        out[..len].copy_from_slice(&frame[..len]);
        len
    }

    fn write_network(&mut self, data: &DmrData) {
        if self.is_rf_active() {
            tracing::trace!(slot = %self.slot, "RF traffic active, network frame dropped");
            return;
        }

        match self.net {
            NetState::Rejected(id) if id == data.stream_id => return,
            NetState::Active(s) if s.stream_id == data.stream_id => {}
            _ => {
                // A new stream replaces one that never sent its terminator
                if self.is_net_active() {
                    self.end_net("transmission lost");
                    if !self.jitter.is_empty() {
                        tracing::debug!(slot = %self.slot, "Dropping {} buffered frames of the lost stream", self.jitter.len());
                        self.jitter.clear();
                    }
                }

                if !self.ctx.access.validate_tg_id(self.slot, TrafficSource::Net, data.is_group(), data.dst_id) {
                    tracing::debug!(slot = %self.slot, "Net traffic from {} rejected", self.describe(data.src_id, data.is_group(), data.dst_id));
                    self.net = NetState::Rejected(data.stream_id);
                    return;
                }

                tracing::info!(slot = %self.slot, "Net transmission from {}", self.describe(data.src_id, data.is_group(), data.dst_id));
                self.ctx.display.write_dmr(
                    self.slot,
                    TrafficSource::Net,
                    &self.ctx.lookup.find(data.src_id),
                    data.is_group(),
                    &self.ctx.lookup.find(data.dst_id),
                );
                self.net = NetState::Active(Stream::new(data.src_id, data.dst_id, data.is_group(), data.stream_id));
                self.jitter.clear();
                self.releasing = false;
            }
        }

        let flags = match data.data_type {
            DT_VOICE_SYNC => DMR_SYNC_AUDIO,
            DT_VOICE => data.n & DT_MASK,
            dt => DMR_SYNC_DATA | (dt & DT_MASK),
        };
        let mut frame = Vec::with_capacity(DMR_MODEM_FRAME_LENGTH);
        frame.push(TAG_DATA);
        frame.push(flags);
        frame.extend_from_slice(&data.data);
        self.jitter.push_back(frame);
        self.net_idle_ticks = 0;

        if let NetState::Active(s) = &mut self.net {
            s.frames += 1;
        }
        if self.jitter.len() >= self.ctx.config.jitter_frames() {
            self.releasing = true;
        }
        if data.data_type == DT_TERMINATOR_WITH_LC {
            self.end_net("end of transmission");
        }
    }

    fn clock(&mut self) {
        if self.is_net_active() || !self.jitter.is_empty() {
            self.net_idle_ticks += 1;
            if self.is_net_active() && self.net_idle_ticks >= NET_STREAM_TIMEOUT_TICKS {
                self.end_net("transmission lost");
            } else if self.net_idle_ticks as usize >= self.ctx.config.jitter_frames() {
                self.releasing = true;
            }
        }

        if self.releasing {
            if let Some(frame) = self.jitter.pop_front() {
                self.tx_queue.push_back(frame);
            }
            if self.jitter.is_empty() {
                self.releasing = false;
            }
        }
    }
}
