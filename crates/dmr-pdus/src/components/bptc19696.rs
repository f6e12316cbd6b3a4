//! BPTC(196,96) block product turbo code, as used for CSBKs, headers and data blocks.
//!
//! The 196 coded bits are spread around the 68 bit centre of the burst (slot type and sync),
//! interleaved with step 181, and form a 13 x 15 matrix: 9 rows protected by Hamming(15,11,3)
//! and 15 columns protected by Hamming(13,9,3). Bit 0 of the matrix is unused.

use dmr_core::{DMR_FRAME_LENGTH_BYTES, PduParseErr, expect_len};

use super::hamming::{self, HammingResult};

pub const BPTC_CODED_BITS: usize = 196;
pub const BPTC_DATA_BYTES: usize = 12;

const ROWS: usize = 13;
const COLS: usize = 15;
const DATA_ROWS: usize = 9;
const MAX_PASSES: usize = 5;

/// Matrix positions carrying payload bits, in payload order.
/// Row 0 starts with three reserved bits, so it only carries 8.
fn data_positions() -> impl Iterator<Item = usize> {
    (4..12).chain((1..DATA_ROWS).flat_map(|r| {
        let start = r * COLS + 1;
        start..start + 11
    }))
}

fn interleave_index(a: usize) -> usize {
    (a * 181) % BPTC_CODED_BITS
}

fn byte_to_bits(b: u8) -> [bool; 8] {
    let mut out = [false; 8];
    for (i, bit) in out.iter_mut().enumerate() {
        *bit = (b >> (7 - i)) & 1 == 1;
    }
    out
}

fn bits_to_byte(bits: &[bool]) -> u8 {
    bits.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8)
}

/// Pulls the 196 coded bits out of a burst, skipping the centre field.
fn extract_binary(burst: &[u8]) -> [bool; BPTC_CODED_BITS] {
    let mut raw = [false; BPTC_CODED_BITS];
    for i in 0..12 {
        raw[i * 8..i * 8 + 8].copy_from_slice(&byte_to_bits(burst[i]));
    }
    let b12 = byte_to_bits(burst[12]);
    raw[96] = b12[0];
    raw[97] = b12[1];
    let b20 = byte_to_bits(burst[20]);
    raw[98] = b20[6];
    raw[99] = b20[7];
    for i in 0..12 {
        raw[100 + i * 8..108 + i * 8].copy_from_slice(&byte_to_bits(burst[21 + i]));
    }
    raw
}

/// Writes the 196 coded bits into a burst, leaving the centre field untouched.
fn insert_binary(raw: &[bool; BPTC_CODED_BITS], burst: &mut [u8]) {
    for i in 0..12 {
        burst[i] = bits_to_byte(&raw[i * 8..i * 8 + 8]);
    }
    burst[12] = (burst[12] & 0x3F) | ((raw[96] as u8) << 7) | ((raw[97] as u8) << 6);
    burst[20] = (burst[20] & 0xFC) | ((raw[98] as u8) << 1) | raw[99] as u8;
    for i in 0..12 {
        burst[21 + i] = bits_to_byte(&raw[100 + i * 8..108 + i * 8]);
    }
}

/// Runs column and row correction until nothing changes. Returns false if a codeword
/// is still uncorrectable after the last pass.
fn error_check(m: &mut [bool; BPTC_CODED_BITS]) -> bool {
    let mut clean = false;
    for _ in 0..MAX_PASSES {
        let mut fixing = false;
        clean = true;

        for c in 0..COLS {
            let mut col = [false; ROWS];
            for (r, bit) in col.iter_mut().enumerate() {
                *bit = m[c + 1 + r * COLS];
            }
            match hamming::decode_1393(&mut col) {
                HammingResult::Valid => {}
                HammingResult::Corrected => {
                    for (r, bit) in col.iter().enumerate() {
                        m[c + 1 + r * COLS] = *bit;
                    }
                    fixing = true;
                }
                HammingResult::Uncorrectable => clean = false,
            }
        }

        for r in 0..DATA_ROWS {
            let pos = r * COLS + 1;
            match hamming::decode_15113(&mut m[pos..pos + COLS]) {
                HammingResult::Valid => {}
                HammingResult::Corrected => fixing = true,
                HammingResult::Uncorrectable => clean = false,
            }
        }

        if !fixing {
            break;
        }
    }
    clean
}

/// Decodes the 12 payload bytes from a 33 byte burst.
pub fn decode(burst: &[u8]) -> Result<[u8; BPTC_DATA_BYTES], PduParseErr> {
    expect_len!(burst, DMR_FRAME_LENGTH_BYTES)?;

    let raw = extract_binary(burst);
    let mut m = [false; BPTC_CODED_BITS];
    for (a, bit) in m.iter_mut().enumerate() {
        *bit = raw[interleave_index(a)];
    }

    if !error_check(&mut m) {
        return Err(PduParseErr::Uncorrectable { field: "bptc19696" });
    }

    let bits: Vec<bool> = data_positions().map(|p| m[p]).collect();
    let mut out = [0u8; BPTC_DATA_BYTES];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = bits_to_byte(&bits[i * 8..i * 8 + 8]);
    }
    Ok(out)
}

/// Encodes 12 payload bytes into `burst`. The slot type and sync in the centre are preserved.
pub fn encode(payload: &[u8; BPTC_DATA_BYTES], burst: &mut [u8]) {
    assert!(burst.len() >= DMR_FRAME_LENGTH_BYTES, "burst buffer too short");

    let mut m = [false; BPTC_CODED_BITS];
    for (i, p) in data_positions().enumerate() {
        m[p] = (payload[i / 8] >> (7 - (i % 8))) & 1 == 1;
    }

    for r in 0..DATA_ROWS {
        let pos = r * COLS + 1;
        hamming::encode_15113(&mut m[pos..pos + COLS]);
    }
    for c in 0..COLS {
        let mut col = [false; ROWS];
        for (r, bit) in col.iter_mut().enumerate() {
            *bit = m[c + 1 + r * COLS];
        }
        hamming::encode_1393(&mut col);
        for (r, bit) in col.iter().enumerate() {
            m[c + 1 + r * COLS] = *bit;
        }
    }

    let mut raw = [false; BPTC_CODED_BITS];
    for (a, bit) in m.iter().enumerate() {
        raw[interleave_index(a)] = *bit;
    }
    insert_binary(&raw, burst);
}
