pub mod bptc19696;
pub mod crc;
pub mod hamming;

use dmr_core::DmrId;

/// Reads a 24 bit big-endian id
#[inline]
pub(crate) fn read_u24(b: &[u8]) -> DmrId {
    (b[0] as u32) << 16 | (b[1] as u32) << 8 | b[2] as u32
}

#[inline]
pub(crate) fn write_u24(b: &mut [u8], v: DmrId) {
    b[0] = (v >> 16) as u8;
    b[1] = (v >> 8) as u8;
    b[2] = v as u8;
}
