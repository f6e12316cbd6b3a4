use dmr_core::{SlotId, TrafficSource};

/// Status sink for call activity, typically a front panel or a status page
pub trait DmrDisplay: Send + Sync {
    fn write_dmr(&self, slot: SlotId, source: TrafficSource, src: &str, group: bool, dst: &str);
    fn clear_dmr(&self, slot: SlotId);
}

/// Display that only logs
#[derive(Debug, Default)]
pub struct LogDisplay;

impl DmrDisplay for LogDisplay {
    fn write_dmr(&self, slot: SlotId, source: TrafficSource, src: &str, group: bool, dst: &str) {
        tracing::info!(slot = %slot, "{} {} -> {}{}", source, src, if group { "TG " } else { "" }, dst);
    }

    fn clear_dmr(&self, slot: SlotId) {
        tracing::debug!(slot = %slot, "idle");
    }
}
