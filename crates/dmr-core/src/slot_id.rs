/// One of the two TDMA timeslots sharing a DMR carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SlotId {
    One = 1,
    Two = 2,
}

impl SlotId {
    pub const ALL: [SlotId; 2] = [SlotId::One, SlotId::Two];

    /// Zero-based index, for use with per-slot arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            SlotId::One => 0,
            SlotId::Two => 1,
        }
    }

    /// Convert this enum back into the raw slot number
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

impl std::convert::TryFrom<u8> for SlotId {
    type Error = u8;
    fn try_from(x: u8) -> Result<Self, Self::Error> {
        match x {
            1 => Ok(SlotId::One),
            2 => Ok(SlotId::Two),
            other => Err(other),
        }
    }
}

impl From<SlotId> for u8 {
    fn from(s: SlotId) -> Self { s.into_raw() }
}

impl core::fmt::Display for SlotId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TS{}", self.into_raw())
    }
}
