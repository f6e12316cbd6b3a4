use core::fmt;

use dmr_core::{DmrId, Flco, PduParseErr};

use crate::components::{bptc19696, read_u24, write_u24};

const FLCO_GROUP: u8 = 0x00;
const FLCO_USER_USER: u8 = 0x03;

/// Full Link Control, carried BPTC coded in voice LC headers and terminators.
/// The RS(12,9) parity in bytes 9..12 is neither checked nor generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullLc {
    // 1
    pub protect: bool,
    // 6
    pub flco: Flco,
    // 8
    pub fid: u8,
    // 8
    pub service_options: u8,
    // 24
    pub dst_id: DmrId,
    // 24
    pub src_id: DmrId,
}

impl FullLc {
    pub fn new(flco: Flco, src_id: DmrId, dst_id: DmrId) -> Self {
        Self { protect: false, flco, fid: 0, service_options: 0, dst_id, src_id }
    }

    pub fn from_burst(burst: &[u8]) -> Result<Self, PduParseErr> {
        let block = bptc19696::decode(burst)?;

        let flco = match block[0] & 0x3F {
            FLCO_GROUP => Flco::Group,
            FLCO_USER_USER => Flco::UserUser,
            other => return Err(PduParseErr::InvalidValue { field: "flco", value: other as u64 }),
        };

        Ok(FullLc {
            protect: block[0] & 0x80 != 0,
            flco,
            fid: block[1],
            service_options: block[2],
            dst_id: read_u24(&block[3..6]),
            src_id: read_u24(&block[6..9]),
        })
    }

    /// Encodes into `burst`, leaving its sync/slot type centre untouched. Parity bytes are zero.
    pub fn to_burst(&self, burst: &mut [u8]) {
        let mut block = [0u8; 12];
        block[0] = (self.protect as u8) << 7
            | match self.flco {
                Flco::Group => FLCO_GROUP,
                Flco::UserUser => FLCO_USER_USER,
            };
        block[1] = self.fid;
        block[2] = self.service_options;
        write_u24(&mut block[3..6], self.dst_id);
        write_u24(&mut block[6..9], self.src_id);
        bptc19696::encode(&block, burst);
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        self.flco == Flco::Group
    }
}

impl fmt::Display for FullLc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FullLc {{ src: {} dst: {}{} fid: {} }}",
            self.src_id,
            if self.is_group() { "TG " } else { "" },
            self.dst_id,
            self.fid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmr_core::debug;

    #[test]
    fn test_voice_header_fields() {
        debug::setup_logging_verbose();
        let lc = FullLc::new(Flco::UserUser, 2_341_234, 2_351_111);
        let mut burst = [0u8; 33];
        lc.to_burst(&mut burst);

        let parsed = FullLc::from_burst(&burst).unwrap();
        assert_eq!(parsed, lc);
        assert!(!parsed.is_group());
    }

    #[test]
    fn test_unknown_flco() {
        let mut block = [0u8; 12];
        block[0] = 0x30;
        let mut burst = [0u8; 33];
        bptc19696::encode(&block, &mut burst);
        assert!(matches!(FullLc::from_burst(&burst), Err(PduParseErr::InvalidValue { field: "flco", .. })));
    }
}
