use std::sync::{Arc, Mutex};

use dmr_config::ControlConfig;
use dmr_core::{DMR_IDLE_RX, DMR_SYNC_DATA, DT_CSBK, DmrId, SlotId, TAG_DATA};
use dmr_entities::{ControlDeps, ControlDispatcher, DmrIdLookup, DmrModem, DmrNetwork, DmrSlot, RelaySlot, SlotContext};
use dmr_pdus::csbk::Csbk;

use super::fakes::{FakeDisplay, FakeModem, FakeNetwork};
use super::recording_slot::{Journal, RecordingSlot, SlotEvent};

pub const REPEATER_ID: DmrId = 2_341_234;

const TEST_IDS: &str = "\
2341234 GB7XX Repeater
2351111 M0XYZ Bob
2352222 G4ABC Alan
";

/// Creates a default config for testing. It can still be modified as needed
/// before passing it to a Bench constructor
pub fn default_test_config() -> ControlConfig {
    let mut cfg = ControlConfig::new(REPEATER_ID, 1);
    cfg.jitter_ms = 180;
    cfg
}

/// BS_Dwn_Act from `src_id` for base station `bs_id`, as the modem delivers it while idle
pub fn wakeup_frame(bs_id: DmrId, src_id: DmrId) -> Vec<u8> {
    let mut frame = vec![0u8; 35];
    frame[0] = TAG_DATA;
    frame[1] = DMR_IDLE_RX | DMR_SYNC_DATA | DT_CSBK;
    Csbk::bs_dwn_act(bs_id, src_id).to_burst(&mut frame[2..]);
    frame
}

/// Dispatcher wired to fakes, for end-to-end testing
pub struct Bench {
    pub dispatcher: ControlDispatcher,
    pub modem: Arc<Mutex<FakeModem>>,
    pub network: Option<Arc<Mutex<FakeNetwork>>>,
    pub display: Arc<FakeDisplay>,
    pub journal: Journal,
}

impl Bench {
    /// RecordingSlots on both timeslots
    pub fn recording(config: ControlConfig, with_network: bool) -> Self {
        let journal: Journal = Arc::new(Mutex::new(vec![]));
        let j = journal.clone();
        Self::build(config, with_network, journal, move |slot, _ctx| Box::new(RecordingSlot::new(slot, j.clone())) as Box<dyn DmrSlot>)
    }

    /// RelaySlots on both timeslots
    pub fn relay(config: ControlConfig, with_network: bool) -> Self {
        Self::build(config, with_network, Arc::new(Mutex::new(vec![])), |slot, ctx| Box::new(RelaySlot::new(slot, ctx)) as Box<dyn DmrSlot>)
    }

    fn build<F>(config: ControlConfig, with_network: bool, journal: Journal, make_slot: F) -> Self
    where
        F: FnMut(SlotId, Arc<SlotContext>) -> Box<dyn DmrSlot>,
    {
        let modem = Arc::new(Mutex::new(FakeModem::default()));
        let network = with_network.then(|| Arc::new(Mutex::new(FakeNetwork::default())));
        let display = Arc::new(FakeDisplay::default());
        let lookup = DmrIdLookup::from_reader(TEST_IDS.as_bytes()).unwrap();

        let deps = ControlDeps {
            modem: modem.clone() as Arc<Mutex<dyn DmrModem>>,
            network: network.clone().map(|n| n as Arc<Mutex<dyn DmrNetwork>>),
            display: display.clone(),
            lookup: Arc::new(lookup),
        };
        let dispatcher = ControlDispatcher::new(Arc::new(config), deps, make_slot).unwrap();

        Self { dispatcher, modem, network, display, journal }
    }

    pub fn push_network(&self, data: dmr_core::DmrData) {
        self.network.as_ref().expect("bench has no network").lock().unwrap().inbound.push_back(data);
    }

    /// Everything the dispatcher did to `slot`, in order
    pub fn slot_events(&self, slot: SlotId) -> Vec<SlotEvent> {
        self.journal.lock().unwrap().iter().filter(|(s, _)| *s == slot).map(|(_, e)| e.clone()).collect()
    }

    pub fn all_events(&self) -> Vec<(SlotId, SlotEvent)> {
        self.journal.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.journal.lock().unwrap().clear();
    }
}
