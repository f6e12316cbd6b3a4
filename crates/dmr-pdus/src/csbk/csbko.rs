/// ETSI TS 102 361-2 CSBK opcodes
/// Bits: 6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Csbko {
    /// Unit to unit voice service request
    UuVReq,
    /// Unit to unit voice service answer response
    UuAnsRsp,
    /// Channel timing CSBK
    CtCsbk,
    /// Negative acknowledgement response
    NackRsp,
    /// BS outbound activation
    BsDwnAct,
    /// Preamble CSBK
    PreCcsbk,
    /// Anything we don't interpret, kept so the block can be forwarded untouched
    Other(u8),
}

impl Csbko {
    pub fn from_raw(x: u8) -> Self {
        match x & 0x3F {
            0x04 => Csbko::UuVReq,
            0x05 => Csbko::UuAnsRsp,
            0x07 => Csbko::CtCsbk,
            0x26 => Csbko::NackRsp,
            0x38 => Csbko::BsDwnAct,
            0x3D => Csbko::PreCcsbk,
            other => Csbko::Other(other),
        }
    }

    /// Convert this enum back into the raw 6 bit value
    pub fn into_raw(self) -> u8 {
        match self {
            Csbko::UuVReq => 0x04,
            Csbko::UuAnsRsp => 0x05,
            Csbko::CtCsbk => 0x07,
            Csbko::NackRsp => 0x26,
            Csbko::BsDwnAct => 0x38,
            Csbko::PreCcsbk => 0x3D,
            Csbko::Other(v) => v & 0x3F,
        }
    }
}

impl core::fmt::Display for Csbko {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Csbko::UuVReq => write!(f, "UU_V_Req"),
            Csbko::UuAnsRsp => write!(f, "UU_Ans_Rsp"),
            Csbko::CtCsbk => write!(f, "CT_CSBK"),
            Csbko::NackRsp => write!(f, "NACK_Rsp"),
            Csbko::BsDwnAct => write!(f, "BS_Dwn_Act"),
            Csbko::PreCcsbk => write!(f, "Pre_CSBK"),
            Csbko::Other(v) => write!(f, "Other(0x{:02x})", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values() {
        assert_eq!(Csbko::from_raw(0x38), Csbko::BsDwnAct);
        // LB and PF bits are not part of the opcode
        assert_eq!(Csbko::from_raw(0xB8), Csbko::BsDwnAct);
        assert_eq!(Csbko::from_raw(0x3D).into_raw(), 0x3D);
        assert_eq!(Csbko::from_raw(0x11), Csbko::Other(0x11));
    }
}
