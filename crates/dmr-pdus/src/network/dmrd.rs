//! DMRD packets of the Homebrew repeater protocol

use dmr_core::{DMR_FRAME_LENGTH_BYTES, DT_MASK, DT_VOICE, DT_VOICE_SYNC, DmrData, Flco, PduParseErr, expect_len};

use crate::components::read_u24;

pub const DMRD_MAGIC: &[u8; 4] = b"DMRD";
pub const DMRD_LENGTH: usize = 55;

/// Header up to and including the stream id; BER and RSSI trail the burst
const DMRD_MIN_LENGTH: usize = 20 + DMR_FRAME_LENGTH_BYTES;

const FLAG_SLOT2: u8 = 0x80;
const FLAG_PRIVATE: u8 = 0x40;
const FLAG_DATA_SYNC: u8 = 0x20;
const FLAG_VOICE_SYNC: u8 = 0x10;

/// Decodes a DMRD packet. Returns the frame together with the repeater id it was addressed to.
pub fn decode(buf: &[u8]) -> Result<(DmrData, u32), PduParseErr> {
    expect_len!(buf, DMRD_MIN_LENGTH)?;
    if &buf[0..4] != DMRD_MAGIC {
        return Err(PduParseErr::InvalidValue {
            field: "magic",
            value: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as u64,
        });
    }

    let flags = buf[15];
    let (data_type, n) = if flags & FLAG_DATA_SYNC != 0 {
        (flags & DT_MASK, 0)
    } else if flags & FLAG_VOICE_SYNC != 0 {
        (DT_VOICE_SYNC, 0)
    } else {
        (DT_VOICE, flags & DT_MASK)
    };

    let mut data = DmrData {
        slot_no: if flags & FLAG_SLOT2 != 0 { 2 } else { 1 },
        src_id: read_u24(&buf[5..8]),
        dst_id: read_u24(&buf[8..11]),
        flco: if flags & FLAG_PRIVATE != 0 { Flco::UserUser } else { Flco::Group },
        data_type,
        seq_no: buf[4],
        n,
        stream_id: u32::from_be_bytes([buf[16], buf[17], buf[18], buf[19]]),
        ..Default::default()
    };
    data.data.copy_from_slice(&buf[20..20 + DMR_FRAME_LENGTH_BYTES]);
    if buf.len() >= DMRD_LENGTH {
        data.ber = buf[53];
        data.rssi = buf[54];
    }

    let repeater_id = u32::from_be_bytes([buf[11], buf[12], buf[13], buf[14]]);
    Ok((data, repeater_id))
}

/// Encodes a DMRD packet on behalf of `repeater_id`.
/// Slot numbers other than 2 are sent as slot 1; callers route by SlotId before this point.
pub fn encode(data: &DmrData, repeater_id: u32) -> [u8; DMRD_LENGTH] {
    let mut buf = [0u8; DMRD_LENGTH];
    buf[0..4].copy_from_slice(DMRD_MAGIC);
    buf[4] = data.seq_no;
    buf[5..8].copy_from_slice(&data.src_id.to_be_bytes()[1..4]);
    buf[8..11].copy_from_slice(&data.dst_id.to_be_bytes()[1..4]);
    buf[11..15].copy_from_slice(&repeater_id.to_be_bytes());

    let mut flags = if data.slot_no == 2 { FLAG_SLOT2 } else { 0 };
    if data.flco == Flco::UserUser {
        flags |= FLAG_PRIVATE;
    }
    flags |= match data.data_type {
        DT_VOICE_SYNC => FLAG_VOICE_SYNC,
        DT_VOICE => data.n & DT_MASK,
        dt => FLAG_DATA_SYNC | (dt & DT_MASK),
    };
    buf[15] = flags;

    buf[16..20].copy_from_slice(&data.stream_id.to_be_bytes());
    buf[20..53].copy_from_slice(&data.data);
    buf[53] = data.ber;
    buf[54] = data.rssi;
    buf
}
