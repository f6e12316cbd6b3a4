use dmr_core::SlotId;

pub mod udp_modem;

/// Per-slot frame interface to the radio modem. Frames are tagged: byte 0 is a TAG_*
/// value, byte 1 the sync/data type flags, then the burst and optionally two RSSI bytes.
pub trait DmrModem: Send {
    /// Copies the next received frame for `slot` into `out`. Returns 0 when there is none.
    fn read_dmr_data(&mut self, slot: SlotId, out: &mut [u8]) -> usize;

    /// Whether the modem can take another frame for `slot`
    fn has_dmr_space(&self, slot: SlotId) -> bool;

    fn write_dmr_data(&mut self, slot: SlotId, frame: &[u8]) -> bool;

    /// Keys (`true`) or unkeys the transmitter of a duplex modem
    fn write_dmr_start(&mut self, tx: bool) -> bool;

    /// Drops whatever is still queued for transmission on `slot`
    fn write_dmr_abort(&mut self, slot: SlotId) -> bool;
}
