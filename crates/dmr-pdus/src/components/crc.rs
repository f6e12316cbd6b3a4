/// CRC-16 (ITU-T / CCITT) over byte streams, MSB first.
pub const GEN_POLY: u16 = 0x1021;

#[inline]
pub fn get_nth_bit(input: &[u8], bit: usize) -> u16 {
    let byte = bit / 8;
    let bit_in_byte = 7 - (bit % 8);
    ((input[byte] >> bit_in_byte) & 1) as u16
}

/// CRC-16 ITU-T over a byte stream, processing `number_bits` bits (MSB first).
/// `crc` is the initial CRC value.
/// Returns the updated CRC.
pub fn crc16_itut_bytes(mut crc: u16, input: &[u8], number_bits: usize) -> u16 {
    for i in 0..number_bits {
        let bit = get_nth_bit(input, i);
        crc ^= bit << 15;
        if (crc & 0x8000) != 0 {
            crc = (crc << 1) ^ GEN_POLY;
        } else {
            crc <<= 1;
        }
    }
    crc
}

/// CRC-CCITT with initial value 0 and inverted result, as used to protect CSBKs and data headers.
pub fn crc16_ccitt162(input: &[u8]) -> u16 {
    !crc16_itut_bytes(0, input, input.len() * 8)
}

/// Checks a block whose last two bytes carry the CRC of the preceding bytes, big-endian.
pub fn check_ccitt162(block: &[u8]) -> bool {
    if block.len() < 2 {
        return false;
    }
    let split = block.len() - 2;
    let crc = crc16_ccitt162(&block[..split]);
    block[split] == (crc >> 8) as u8 && block[split + 1] == crc as u8
}

/// Computes the CRC over all but the last two bytes, and stores it there.
pub fn add_ccitt162(block: &mut [u8]) {
    assert!(block.len() >= 2, "block too short to carry a CRC");
    let split = block.len() - 2;
    let crc = crc16_ccitt162(&block[..split]);
    block[split] = (crc >> 8) as u8;
    block[split + 1] = crc as u8;
}
