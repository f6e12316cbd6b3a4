//! Allow/deny policy for source and destination ids

use dmr_config::{CfgDstIdList, ControlConfig};
use dmr_core::{DmrId, SlotId, TrafficSource};

/// Read-only access policy, built once from the config and shared between the dispatcher and the slots
#[derive(Debug, Clone)]
pub struct AccessControl {
    repeater_id: DmrId,
    self_only: bool,
    prefixes: Vec<u32>,
    src_blacklist: Vec<DmrId>,
    /// Indexed by slot, then RF (0) / network (1)
    dst_lists: [[CfgDstIdList; 2]; 2],
}

impl AccessControl {
    pub fn from_config(config: &ControlConfig) -> Self {
        let lists = &config.access;
        let per_slot = |slot: SlotId| {
            [
                lists.dst_lists(slot, TrafficSource::Rf).clone(),
                lists.dst_lists(slot, TrafficSource::Net).clone(),
            ]
        };
        Self {
            repeater_id: config.id,
            self_only: lists.self_only,
            prefixes: lists.prefixes.clone(),
            src_blacklist: lists.src_blacklist.clone(),
            dst_lists: [per_slot(SlotId::One), per_slot(SlotId::Two)],
        }
    }

    /// Checks whether traffic from `id` may be processed at all
    pub fn validate_src_id(&self, id: DmrId) -> bool {
        if self.self_only {
            return self.is_own_id(id);
        }

        if self.src_blacklist.contains(&id) {
            return false;
        }

        let prefix = id / 10000;
        if prefix == 0 || prefix > 999 {
            return false;
        }

        self.prefixes.is_empty() || self.prefixes.contains(&prefix)
    }

    /// Checks whether a call to `id` may be carried on `slot` when it arrived from `source`.
    /// Private calls are never filtered by the talkgroup lists.
    pub fn validate_tg_id(&self, slot: SlotId, source: TrafficSource, group: bool, id: DmrId) -> bool {
        if !group {
            return true;
        }
        if id == 0 {
            return false;
        }

        let lists = &self.dst_lists[slot.index()][if source.is_rf() { 0 } else { 1 }];
        if lists.blacklist.contains(&id) {
            return false;
        }

        lists.whitelist.is_empty() || lists.whitelist.contains(&id)
    }

    /// Hotspot ids may carry one or two extra digits behind the owner's 7 digit id
    fn is_own_id(&self, id: DmrId) -> bool {
        let own = self.repeater_id;
        if own > 99_999_999 {
            id == own / 100
        } else if own > 9_999_999 {
            id == own / 10
        } else {
            id == own
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(edit: impl FnOnce(&mut ControlConfig)) -> AccessControl {
        let mut cfg = ControlConfig::new(2_341_234, 1);
        edit(&mut cfg);
        AccessControl::from_config(&cfg)
    }

    #[test]
    fn test_src_prefix() {
        let open = policy(|_| {});
        assert!(open.validate_src_id(2_345_678));
        assert!(!open.validate_src_id(9_999), "prefix 0");
        assert!(!open.validate_src_id(10_000_000), "prefix 1000");

        let uk = policy(|c| c.access.prefixes = vec![234, 235]);
        assert!(uk.validate_src_id(2_351_111));
        assert!(!uk.validate_src_id(3_101_111));
    }

    #[test]
    fn test_src_blacklist() {
        let p = policy(|c| c.access.src_blacklist = vec![2_345_678]);
        assert!(!p.validate_src_id(2_345_678));
        assert!(p.validate_src_id(2_345_679));
    }

    #[test]
    fn test_self_only() {
        let p = policy(|c| c.access.self_only = true);
        assert!(p.validate_src_id(2_341_234));
        assert!(!p.validate_src_id(2_341_235));

        // 9 digit hotspot id belongs to the 7 digit owner
        let p = policy(|c| {
            c.id = 234_123_401;
            c.access.self_only = true;
        });
        assert!(p.validate_src_id(2_341_234));
        assert!(!p.validate_src_id(234_123_401));

        let p = policy(|c| {
            c.id = 23_412_341;
            c.access.self_only = true;
        });
        assert!(p.validate_src_id(2_341_234));
    }

    #[test]
    fn test_tg_lists() {
        let p = policy(|c| {
            c.access.slot1_rf.blacklist = vec![9];
            c.access.slot2_net.whitelist = vec![91, 2350];
        });

        assert!(!p.validate_tg_id(SlotId::One, TrafficSource::Rf, true, 0));
        assert!(!p.validate_tg_id(SlotId::One, TrafficSource::Rf, true, 9));
        assert!(p.validate_tg_id(SlotId::One, TrafficSource::Net, true, 9));
        assert!(p.validate_tg_id(SlotId::One, TrafficSource::Rf, false, 9));

        assert!(p.validate_tg_id(SlotId::Two, TrafficSource::Net, true, 2350));
        assert!(!p.validate_tg_id(SlotId::Two, TrafficSource::Net, true, 2351));
        assert!(p.validate_tg_id(SlotId::Two, TrafficSource::Rf, true, 2351));
    }
}
