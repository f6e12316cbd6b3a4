use core::fmt;

use dmr_core::{DmrId, PduParseErr, expect_len};

use crate::components::{bptc19696, crc, read_u24, write_u24};

use super::csbko::Csbko;

pub const CSBK_LENGTH_BYTES: usize = 12;

/// XORed onto the CRC so a CSBK can't be mistaken for another block type
const CSBK_CRC_MASK: [u8; 2] = [0xA5, 0xA5];

/// ETSI TS 102 361-2 Control Signalling Block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Csbk {
    // 1
    pub last_block: bool,
    // 1
    pub protect: bool,
    // 6
    pub csbko: Csbko,
    // 8, feature set id
    pub fid: u8,

    /// Pre_CSBK only
    pub group: bool,
    /// BS_Dwn_Act only, the base station being addressed
    pub bs_id: DmrId,
    pub src_id: DmrId,
    pub dst_id: DmrId,

    /// Bytes 0..10 as received. Fields of opcodes we don't interpret survive re-encoding.
    raw: [u8; 10],
}

impl Csbk {
    /// BS_Dwn_Act sent by `src_id` to wake up base station `bs_id`
    pub fn bs_dwn_act(bs_id: DmrId, src_id: DmrId) -> Self {
        Csbk {
            last_block: true,
            protect: false,
            csbko: Csbko::BsDwnAct,
            fid: 0,
            group: false,
            bs_id,
            src_id,
            dst_id: 0,
            raw: [0; 10],
        }
    }

    /// Decodes a CSBK from the 33 byte burst it was received in
    pub fn from_burst(burst: &[u8]) -> Result<Self, PduParseErr> {
        let block = bptc19696::decode(burst)?;
        Self::from_block(&block)
    }

    /// Decodes a CSBK from the 12 byte block left after FEC decoding
    pub fn from_block(block: &[u8]) -> Result<Self, PduParseErr> {
        expect_len!(block, CSBK_LENGTH_BYTES)?;

        let mut data = [0u8; CSBK_LENGTH_BYTES];
        data.copy_from_slice(&block[..CSBK_LENGTH_BYTES]);
        data[10] ^= CSBK_CRC_MASK[0];
        data[11] ^= CSBK_CRC_MASK[1];
        if !crc::check_ccitt162(&data) {
            return Err(PduParseErr::CrcMismatch);
        }

        let csbko = Csbko::from_raw(data[0]);
        let mut csbk = Csbk {
            last_block: data[0] & 0x80 != 0,
            protect: data[0] & 0x40 != 0,
            csbko,
            fid: data[1],
            group: false,
            bs_id: 0,
            src_id: 0,
            dst_id: 0,
            raw: [0; 10],
        };
        csbk.raw.copy_from_slice(&data[..10]);

        match csbko {
            Csbko::BsDwnAct => {
                csbk.bs_id = read_u24(&data[4..7]);
                csbk.src_id = read_u24(&data[7..10]);
            }
            Csbko::UuVReq | Csbko::UuAnsRsp => {
                csbk.dst_id = read_u24(&data[4..7]);
                csbk.src_id = read_u24(&data[7..10]);
            }
            Csbko::PreCcsbk => {
                csbk.group = data[2] & 0x40 != 0;
                csbk.dst_id = read_u24(&data[4..7]);
                csbk.src_id = read_u24(&data[7..10]);
            }
            Csbko::NackRsp => {
                csbk.src_id = read_u24(&data[4..7]);
                csbk.dst_id = read_u24(&data[7..10]);
            }
            Csbko::CtCsbk | Csbko::Other(_) => {
                tracing::trace!("fields of {} not interpreted", csbko);
            }
        }

        Ok(csbk)
    }

    /// Encodes into a 12 byte block, including the masked CRC
    pub fn to_block(&self) -> [u8; CSBK_LENGTH_BYTES] {
        let mut data = [0u8; CSBK_LENGTH_BYTES];
        data[..10].copy_from_slice(&self.raw);

        data[0] = (self.last_block as u8) << 7 | (self.protect as u8) << 6 | self.csbko.into_raw();
        data[1] = self.fid;

        match self.csbko {
            Csbko::BsDwnAct => {
                write_u24(&mut data[4..7], self.bs_id);
                write_u24(&mut data[7..10], self.src_id);
            }
            Csbko::UuVReq | Csbko::UuAnsRsp => {
                write_u24(&mut data[4..7], self.dst_id);
                write_u24(&mut data[7..10], self.src_id);
            }
            Csbko::PreCcsbk => {
                data[2] = (data[2] & !0x40) | if self.group { 0x40 } else { 0 };
                write_u24(&mut data[4..7], self.dst_id);
                write_u24(&mut data[7..10], self.src_id);
            }
            Csbko::NackRsp => {
                write_u24(&mut data[4..7], self.src_id);
                write_u24(&mut data[7..10], self.dst_id);
            }
            Csbko::CtCsbk | Csbko::Other(_) => {}
        }

        crc::add_ccitt162(&mut data);
        data[10] ^= CSBK_CRC_MASK[0];
        data[11] ^= CSBK_CRC_MASK[1];
        data
    }

    /// Encodes into the payload part of `burst`, leaving slot type and sync in place
    pub fn to_burst(&self, burst: &mut [u8]) {
        bptc19696::encode(&self.to_block(), burst);
    }
}

impl fmt::Display for Csbk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Csbk {{ {} fid: {}", self.csbko, self.fid)?;
        match self.csbko {
            Csbko::BsDwnAct => write!(f, " bs_id: {} src: {}", self.bs_id, self.src_id)?,
            Csbko::CtCsbk | Csbko::Other(_) => {}
            _ => write!(f, " src: {} dst: {}{}", self.src_id, if self.group { "TG " } else { "" }, self.dst_id)?,
        }
        write!(f, " }}")
    }
}
