//! Single error correcting Hamming codes used by the BPTC(196,96) product code.
//! Codewords are bool slices with the data bits first, followed by the parity bits.

/// Data bit indices feeding each parity bit of Hamming(15,11,3)
const H15113_PARITY: [&[usize]; 4] = [
    &[0, 1, 2, 3, 5, 7, 8],
    &[1, 2, 3, 4, 6, 8, 9],
    &[2, 3, 4, 5, 7, 9, 10],
    &[0, 1, 2, 4, 6, 7, 10],
];

/// Data bit indices feeding each parity bit of Hamming(13,9,3)
const H1393_PARITY: [&[usize]; 4] = [
    &[0, 1, 3, 5, 6],
    &[0, 1, 2, 4, 6, 7],
    &[0, 1, 2, 3, 5, 7, 8],
    &[0, 2, 4, 5, 8],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HammingResult {
    /// Syndrome was zero
    Valid,
    /// A single bit error was found and flipped back
    Corrected,
    /// More than one bit in error, codeword left untouched
    Uncorrectable,
}

fn parity(d: &[bool], taps: &[usize]) -> bool {
    taps.iter().fold(false, |acc, &i| acc ^ d[i])
}

fn encode(d: &mut [bool], data_bits: usize, taps: &[&[usize]; 4]) {
    for (i, t) in taps.iter().enumerate() {
        d[data_bits + i] = parity(d, t);
    }
}

fn decode(d: &mut [bool], data_bits: usize, taps: &[&[usize]; 4]) -> HammingResult {
    let mut syndrome = 0u8;
    for (i, t) in taps.iter().enumerate() {
        if parity(d, t) != d[data_bits + i] {
            syndrome |= 1 << i;
        }
    }
    if syndrome == 0 {
        return HammingResult::Valid;
    }

    // A parity bit on its own
    if syndrome.count_ones() == 1 {
        let i = syndrome.trailing_zeros() as usize;
        d[data_bits + i] = !d[data_bits + i];
        return HammingResult::Corrected;
    }

    // A data bit flips every parity bit it feeds
    for bit in 0..data_bits {
        let bit_syndrome = taps
            .iter()
            .enumerate()
            .filter(|(_, t)| t.contains(&bit))
            .fold(0u8, |acc, (i, _)| acc | (1 << i));
        if bit_syndrome == syndrome {
            d[bit] = !d[bit];
            return HammingResult::Corrected;
        }
    }
    HammingResult::Uncorrectable
}

/// Fills in d[11..15] from d[0..11]
pub fn encode_15113(d: &mut [bool]) {
    encode(d, 11, &H15113_PARITY);
}

pub fn decode_15113(d: &mut [bool]) -> HammingResult {
    decode(d, 11, &H15113_PARITY)
}

/// Fills in d[9..13] from d[0..9]
pub fn encode_1393(d: &mut [bool]) {
    encode(d, 9, &H1393_PARITY);
}

pub fn decode_1393(d: &mut [bool]) -> HammingResult {
    decode(d, 9, &H1393_PARITY)
}
