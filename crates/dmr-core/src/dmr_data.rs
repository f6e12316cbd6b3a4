use core::fmt;

use crate::defines::DMR_FRAME_LENGTH_BYTES;
use crate::DmrId;

/// Full Link Control Opcode, reduced to the two call types carried over the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flco {
    #[default]
    Group,
    UserUser,
}

/// A single burst as exchanged with the network, together with its addressing metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DmrData {
    /// Raw timeslot number as received. Only 1 and 2 are valid, see SlotId.
    pub slot_no: u8,
    pub src_id: DmrId,
    pub dst_id: DmrId,
    pub flco: Flco,
    /// One of the DT_* values, including DT_VOICE_SYNC and DT_VOICE
    pub data_type: u8,
    pub seq_no: u8,
    /// Voice burst sequence (A-F), only meaningful for DT_VOICE
    pub n: u8,
    pub ber: u8,
    pub rssi: u8,
    pub stream_id: u32,
    pub data: [u8; DMR_FRAME_LENGTH_BYTES],
}

impl Default for DmrData {
    fn default() -> Self {
        Self {
            slot_no: 1,
            src_id: 0,
            dst_id: 0,
            flco: Flco::Group,
            data_type: 0,
            seq_no: 0,
            n: 0,
            ber: 0,
            rssi: 0,
            stream_id: 0,
            data: [0; DMR_FRAME_LENGTH_BYTES],
        }
    }
}

impl DmrData {
    #[inline]
    pub fn is_group(&self) -> bool {
        self.flco == Flco::Group
    }
}

impl fmt::Display for DmrData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DmrData {{ slot: {} src: {} dst: {}{} dt: 0x{:02x} seq: {} stream: {:08x} }}",
            self.slot_no,
            self.src_id,
            if self.is_group() { "TG " } else { "" },
            self.dst_id,
            self.data_type,
            self.seq_no,
            self.stream_id
        )
    }
}
