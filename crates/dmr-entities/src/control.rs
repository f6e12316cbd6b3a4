//! Control dispatcher: routes frames between modem, network and the two slots,
//! and validates BS_Dwn_Act wake-up requests.

use std::fmt;
use std::sync::{Arc, Mutex};

use dmr_config::ControlConfig;
use dmr_core::{BS_ID_ANY, DMR_IDLE_RX, DMR_SYNC_DATA, DT_CSBK, DmrId, SlotId, TAG_DATA};
use dmr_pdus::csbk::{Csbk, Csbko};

use crate::access_control::AccessControl;
use crate::display::DmrDisplay;
use crate::lock;
use crate::lookup::IdentityLookup;
use crate::modem::DmrModem;
use crate::network::DmrNetwork;
use crate::slot::{DmrSlot, RelaySlot, SlotContext};

/// Flag byte of a CSBK received while the repeater is idle
const WAKEUP_FLAGS: u8 = DMR_IDLE_RX | DMR_SYNC_DATA | DT_CSBK;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    InvalidConfig(String),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ControlError {}

/// Adapters the dispatcher and its slots work with. The network is optional.
pub struct ControlDeps {
    pub modem: Arc<Mutex<dyn DmrModem>>,
    pub network: Option<Arc<Mutex<dyn DmrNetwork>>>,
    pub display: Arc<dyn DmrDisplay>,
    pub lookup: Arc<dyn IdentityLookup>,
}

pub struct ControlDispatcher {
    id: DmrId,
    context: Arc<SlotContext>,
    /// Indexed by SlotId::index
    slots: [Box<dyn DmrSlot>; 2],
}

impl ControlDispatcher {
    /// Builds the access policy and both slots from `config`.
    /// `make_slot` is called for slot 1, then slot 2.
    pub fn new<F>(config: Arc<ControlConfig>, deps: ControlDeps, mut make_slot: F) -> Result<Self, ControlError>
    where
        F: FnMut(SlotId, Arc<SlotContext>) -> Box<dyn DmrSlot>,
    {
        if config.id == 0 {
            return Err(ControlError::InvalidConfig("repeater id must be non-zero".to_string()));
        }
        config.validate().map_err(|e| ControlError::InvalidConfig(e.to_string()))?;

        let context = Arc::new(SlotContext {
            access: AccessControl::from_config(&config),
            config: config.clone(),
            modem: deps.modem,
            network: deps.network,
            display: deps.display,
            lookup: deps.lookup,
        });

        let slot1 = make_slot(SlotId::One, context.clone());
        let slot2 = make_slot(SlotId::Two, context.clone());

        tracing::info!(
            "Control dispatcher for repeater {} (CC {}, {}, network {})",
            config.id,
            config.color_code,
            if config.duplex { "duplex" } else { "simplex" },
            if context.network.is_some() { "attached" } else { "none" }
        );

        Ok(Self {
            id: config.id,
            context,
            slots: [slot1, slot2],
        })
    }

    /// Dispatcher with a RelaySlot on each timeslot
    pub fn with_relay_slots(config: Arc<ControlConfig>, deps: ControlDeps) -> Result<Self, ControlError> {
        Self::new(config, deps, |slot, ctx| Box::new(RelaySlot::new(slot, ctx)) as Box<dyn DmrSlot>)
    }

    pub fn id(&self) -> DmrId {
        self.id
    }

    pub fn context(&self) -> &Arc<SlotContext> {
        &self.context
    }

    pub fn slot(&self, slot: SlotId) -> &dyn DmrSlot {
        &*self.slots[slot.index()]
    }

    pub fn slot_mut(&mut self, slot: SlotId) -> &mut dyn DmrSlot {
        &mut *self.slots[slot.index()]
    }

    /// Checks whether `frame`, received on slot 1, is a BS_Dwn_Act addressed to us
    /// (or to any base station) from a source we accept.
    pub fn process_wakeup(&self, frame: &[u8]) -> bool {
        if frame.len() < 2 || frame[0] != TAG_DATA || frame[1] != WAKEUP_FLAGS {
            return false;
        }

        let Ok(csbk) = Csbk::from_burst(&frame[2..]) else {
            return false;
        };
        if csbk.csbko != Csbko::BsDwnAct {
            return false;
        }

        // Wake-ups are only defined on slot 1
        let slot = SlotId::One;
        let src = self.context.lookup.find(csbk.src_id);
        if !self.context.access.validate_src_id(csbk.src_id) {
            tracing::warn!(slot = %slot, "Invalid Downlink Activate received from {}", src);
            return false;
        }

        if csbk.bs_id == BS_ID_ANY {
            tracing::info!(slot = %slot, "Downlink Activate received from {} for ANY", src);
            true
        } else if csbk.bs_id == self.id {
            tracing::info!(slot = %slot, "Downlink Activate received from {} for {}", src, self.id);
            true
        } else {
            false
        }
    }

    /// Hands a frame received over the air to `slot`
    pub fn write_modem_slot(&mut self, slot: SlotId, frame: &[u8]) {
        self.slots[slot.index()].write_modem(frame);
    }

    /// Next frame `slot` wants transmitted, 0 when there is none
    pub fn read_modem_slot(&mut self, slot: SlotId, out: &mut [u8]) -> usize {
        self.slots[slot.index()].read_modem(out)
    }

    /// Once per frame period: route at most one network frame, then tick slot 1 and slot 2
    pub fn clock(&mut self) {
        let received = self.context.network.as_ref().and_then(|net| lock(net).read());

        if let Some(data) = received {
            match SlotId::try_from(data.slot_no) {
                Ok(slot) => self.slots[slot.index()].write_network(&data),
                Err(invalid) => tracing::error!("Invalid slot number received from the network - {}", invalid),
            }
        }

        for slot in self.slots.iter_mut() {
            slot.clock();
        }
    }
}
