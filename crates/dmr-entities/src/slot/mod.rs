use std::sync::{Arc, Mutex};

use as_any::AsAny;
use dmr_config::ControlConfig;
use dmr_core::DmrData;

use crate::access_control::AccessControl;
use crate::display::DmrDisplay;
use crate::lookup::IdentityLookup;
use crate::modem::DmrModem;
use crate::network::DmrNetwork;

pub mod relay_slot;

pub use relay_slot::RelaySlot;

/// Protocol state machine of one TDMA timeslot
pub trait DmrSlot: Send + AsAny {
    /// Frame received over the air on this slot
    fn write_modem(&mut self, frame: &[u8]);

    /// Next frame to transmit on this slot. Returns 0 when there is none.
    fn read_modem(&mut self, out: &mut [u8]) -> usize;

    /// Frame received from the network for this slot
    fn write_network(&mut self, data: &DmrData);

    /// Called once per frame period, whether or not traffic arrived
    fn clock(&mut self);
}

/// Everything a slot needs, built once by the dispatcher and shared by both slots
pub struct SlotContext {
    pub config: Arc<ControlConfig>,
    pub access: AccessControl,
    pub modem: Arc<Mutex<dyn DmrModem>>,
    pub network: Option<Arc<Mutex<dyn DmrNetwork>>>,
    pub display: Arc<dyn DmrDisplay>,
    pub lookup: Arc<dyn IdentityLookup>,
}
