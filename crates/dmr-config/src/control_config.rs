use dmr_core::{DMR_FRAME_PERIOD_MS, DmrId, SlotId, TrafficSource};

/// Destination id filter for one slot and one traffic source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CfgDstIdList {
    pub blacklist: Vec<DmrId>,
    pub whitelist: Vec<DmrId>,
}

/// Allow/deny lists, loaded once into the access policy
#[derive(Debug, Clone, Default)]
pub struct CfgAccessLists {
    /// Only accept traffic from the repeater's own id (hotspot use)
    pub self_only: bool,
    /// Allowed country prefixes (id / 10000). Empty means any.
    pub prefixes: Vec<u32>,
    /// Source ids that are never accepted
    pub src_blacklist: Vec<DmrId>,

    pub slot1_rf: CfgDstIdList,
    pub slot2_rf: CfgDstIdList,
    pub slot1_net: CfgDstIdList,
    pub slot2_net: CfgDstIdList,
}

impl CfgAccessLists {
    pub fn dst_lists(&self, slot: SlotId, source: TrafficSource) -> &CfgDstIdList {
        match (slot, source) {
            (SlotId::One, TrafficSource::Rf) => &self.slot1_rf,
            (SlotId::Two, TrafficSource::Rf) => &self.slot2_rf,
            (SlotId::One, TrafficSource::Net) => &self.slot1_net,
            (SlotId::Two, TrafficSource::Net) => &self.slot2_net,
        }
    }
}

/// Talkgroup rewrite switches. Carried for the slot implementation, not interpreted here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CfgRewrite {
    pub tg_rewrite_slot1: bool,
    pub tg_rewrite_slot2: bool,
    pub bm_auto_rewrite: bool,
    pub bm_rewrite_reflector_voice_prompts: bool,
}

/// Linear calibration of raw modem RSSI readings into dBm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgRssi {
    pub multiplier: i32,
    pub offset: i32,
}

impl Default for CfgRssi {
    fn default() -> Self {
        Self { multiplier: 1, offset: 0 }
    }
}

impl CfgRssi {
    #[inline]
    pub fn to_dbm(&self, raw: u16) -> i32 {
        raw as i32 * self.multiplier + self.offset
    }
}

/// Modem reached over UDP, speaking MMDVM framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgModem {
    pub local_addr: String,
    pub remote_addr: String,
}

/// Homebrew network master reached over UDP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgNetwork {
    pub local_addr: String,
    pub remote_addr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CfgLookup {
    /// File with `id callsign` lines. Without it, ids are shown as numbers.
    pub file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ControlConfig {
    pub debug_log: Option<String>,

    /// Repeater id. Must be non-zero.
    pub id: DmrId,
    /// 4 bits
    pub color_code: u8,
    /// Seconds a slot keeps a call reserved after its last burst
    pub call_hang: u32,
    /// Seconds of continuous transmission before a slot cuts it off
    pub timeout: u32,
    /// Seconds without RF traffic before the host returns to idle mode
    pub mode_hang: u32,
    pub duplex: bool,

    /// Network jitter buffer, in milliseconds
    pub jitter_ms: u32,
    pub rssi: CfgRssi,
    pub rewrite: CfgRewrite,
    pub access: CfgAccessLists,

    pub lookup: CfgLookup,
    pub modem: Option<CfgModem>,
    pub network: Option<CfgNetwork>,
}

impl ControlConfig {
    pub fn new(id: DmrId, color_code: u8) -> Self {
        ControlConfig {
            debug_log: None,
            id,
            color_code,
            call_hang: default_call_hang(),
            timeout: default_timeout(),
            mode_hang: default_mode_hang(),
            duplex: true,
            jitter_ms: default_jitter_ms(),
            rssi: CfgRssi::default(),
            rewrite: CfgRewrite::default(),
            access: CfgAccessLists::default(),
            lookup: CfgLookup::default(),
            modem: None,
            network: None,
        }
    }

    /// Validate that all required configuration fields are properly set.
    pub fn validate(&self) -> Result<(), &str> {
        if self.id == 0 {
            return Err("repeater id must be non-zero");
        }
        if self.color_code > 15 {
            return Err("color_code must be in the range 0-15");
        }
        if self.mode_hang == 0 {
            return Err("mode_hang must be at least one second");
        }
        if self.jitter_ms == 0 {
            return Err("jitter must be at least one frame period");
        }
        if self.access.prefixes.iter().any(|p| *p == 0 || *p > 999) {
            return Err("prefixes must be in the range 1-999");
        }
        Ok(())
    }

    /// Jitter buffer depth in frames, rounded up
    pub fn jitter_frames(&self) -> usize {
        (self.jitter_ms as u64).div_ceil(DMR_FRAME_PERIOD_MS) as usize
    }

    /// Mode hang expressed in dispatcher clock ticks
    pub fn mode_hang_ticks(&self) -> u32 {
        ((self.mode_hang as u64 * 1000) / DMR_FRAME_PERIOD_MS) as u32
    }

    pub fn tg_rewrite(&self, slot: SlotId) -> bool {
        match slot {
            SlotId::One => self.rewrite.tg_rewrite_slot1,
            SlotId::Two => self.rewrite.tg_rewrite_slot2,
        }
    }
}

#[inline]
pub(crate) fn default_call_hang() -> u32 {
    3
}

#[inline]
pub(crate) fn default_timeout() -> u32 {
    180
}

#[inline]
pub(crate) fn default_mode_hang() -> u32 {
    10
}

#[inline]
pub(crate) fn default_jitter_ms() -> u32 {
    360
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ControlConfig::new(2341234, 1).validate().is_ok());
        assert!(ControlConfig::new(0, 1).validate().is_err());
        assert!(ControlConfig::new(2341234, 16).validate().is_err());

        let mut cfg = ControlConfig::new(2341234, 1);
        cfg.jitter_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ControlConfig::new(2341234, 1);
        cfg.mode_hang = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ControlConfig::new(2341234, 1);
        cfg.access.prefixes = vec![234, 1000];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_derived_values() {
        let mut cfg = ControlConfig::new(2341234, 1);
        cfg.jitter_ms = 360;
        assert_eq!(cfg.jitter_frames(), 6);
        cfg.jitter_ms = 100;
        assert_eq!(cfg.jitter_frames(), 2);
        cfg.mode_hang = 3;
        assert_eq!(cfg.mode_hang_ticks(), 50);
        assert_eq!(CfgRssi { multiplier: -1, offset: 43 }.to_dbm(120), -77);
    }
}
