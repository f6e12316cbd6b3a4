//! Framing of the MMDVM modem protocol: start byte, length, command, payload

use core::fmt;

use dmr_core::{PduParseErr, SlotId, TAG_DATA, TAG_LOST, expect_len, expect_value};

pub const MMDVM_FRAME_START: u8 = 0xE0;
const MMDVM_HEADER_LENGTH: usize = 3;

/// MMDVM commands relevant to DMR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmdvmCommand {
    DmrData1,
    DmrLost1,
    DmrData2,
    DmrLost2,
    DmrStart,
    DmrAbort,
    Ack,
    Nak,
    Other(u8),
}

impl MmdvmCommand {
    pub fn from_raw(x: u8) -> Self {
        match x {
            0x18 => MmdvmCommand::DmrData1,
            0x19 => MmdvmCommand::DmrLost1,
            0x1A => MmdvmCommand::DmrData2,
            0x1B => MmdvmCommand::DmrLost2,
            0x1D => MmdvmCommand::DmrStart,
            0x1E => MmdvmCommand::DmrAbort,
            0x70 => MmdvmCommand::Ack,
            0x7F => MmdvmCommand::Nak,
            other => MmdvmCommand::Other(other),
        }
    }

    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u8 {
        match self {
            MmdvmCommand::DmrData1 => 0x18,
            MmdvmCommand::DmrLost1 => 0x19,
            MmdvmCommand::DmrData2 => 0x1A,
            MmdvmCommand::DmrLost2 => 0x1B,
            MmdvmCommand::DmrStart => 0x1D,
            MmdvmCommand::DmrAbort => 0x1E,
            MmdvmCommand::Ack => 0x70,
            MmdvmCommand::Nak => 0x7F,
            MmdvmCommand::Other(v) => v,
        }
    }
}

impl fmt::Display for MmdvmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MmdvmCommand::Other(v) => write!(f, "Other(0x{:02x})", v),
            other => write!(f, "{:?}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MmdvmFrame {
    pub command: MmdvmCommand,
    pub payload: Vec<u8>,
}

impl MmdvmFrame {
    pub fn new(command: MmdvmCommand, payload: Vec<u8>) -> Self {
        Self { command, payload }
    }

    pub fn dmr_start(tx: bool) -> Self {
        Self::new(MmdvmCommand::DmrStart, vec![tx as u8])
    }

    pub fn dmr_abort(slot: SlotId) -> Self {
        Self::new(MmdvmCommand::DmrAbort, vec![slot.into_raw()])
    }

    /// Decodes one frame from the start of `buf`. Returns the frame and the number of bytes used.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), PduParseErr> {
        expect_len!(buf, MMDVM_HEADER_LENGTH)?;
        expect_value!(buf[0], MMDVM_FRAME_START, "frame_start")?;

        let len = buf[1] as usize;
        if len < MMDVM_HEADER_LENGTH {
            return Err(PduParseErr::InvalidValue { field: "length", value: len as u64 });
        }
        expect_len!(buf, len)?;

        let frame = MmdvmFrame {
            command: MmdvmCommand::from_raw(buf[2]),
            payload: buf[MMDVM_HEADER_LENGTH..len].to_vec(),
        };
        Ok((frame, len))
    }

    pub fn encode(&self) -> Vec<u8> {
        let len = MMDVM_HEADER_LENGTH + self.payload.len();
        assert!(len <= u8::MAX as usize, "MMDVM payload too long");

        let mut buf = Vec::with_capacity(len);
        buf.push(MMDVM_FRAME_START);
        buf.push(len as u8);
        buf.push(self.command.into_raw());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Turns received DMR data into the tagged frame the slots consume.
    /// Data frames become TAG_DATA followed by the payload (flag byte, burst, optional RSSI).
    pub fn to_slot_frame(&self) -> Option<(SlotId, Vec<u8>)> {
        let (slot, tag) = match self.command {
            MmdvmCommand::DmrData1 => (SlotId::One, TAG_DATA),
            MmdvmCommand::DmrData2 => (SlotId::Two, TAG_DATA),
            MmdvmCommand::DmrLost1 => (SlotId::One, TAG_LOST),
            MmdvmCommand::DmrLost2 => (SlotId::Two, TAG_LOST),
            _ => return None,
        };

        let mut frame = Vec::with_capacity(1 + self.payload.len());
        frame.push(tag);
        if tag == TAG_DATA {
            frame.extend_from_slice(&self.payload);
        }
        Some((slot, frame))
    }

    /// Wraps a tagged frame read from a slot for transmission. Only TAG_DATA frames go on air.
    pub fn from_slot_frame(slot: SlotId, frame: &[u8]) -> Option<Self> {
        if frame.len() < 2 || frame[0] != TAG_DATA {
            return None;
        }
        let command = match slot {
            SlotId::One => MmdvmCommand::DmrData1,
            SlotId::Two => MmdvmCommand::DmrData2,
        };
        Some(Self::new(command, frame[1..].to_vec()))
    }
}

impl fmt::Display for MmdvmFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MmdvmFrame {{ {} len: {} }}", self.command, self.payload.len())
    }
}
