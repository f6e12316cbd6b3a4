//! Frame loop tying the modem to the dispatcher, with idle/DMR mode handling

use std::sync::{Arc, Mutex};

use dmr_core::{DMR_MODEM_FRAME_LENGTH_RSSI, SlotId, TAG_DATA};

use crate::control::ControlDispatcher;
use crate::lock;
use crate::modem::DmrModem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Transmitter off. A duplex repeater waits for a wake-up on slot 1.
    Idle,
    Dmr,
}

impl core::fmt::Display for HostMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HostMode::Idle => write!(f, "Idle"),
            HostMode::Dmr => write!(f, "DMR"),
        }
    }
}

pub struct RepeaterHost {
    dispatcher: ControlDispatcher,
    modem: Arc<Mutex<dyn DmrModem>>,
    duplex: bool,
    mode: HostMode,
    /// Ticks since the last traffic while in DMR mode
    mode_ticks: u32,
    mode_hang_ticks: u32,
}

impl RepeaterHost {
    pub fn new(dispatcher: ControlDispatcher) -> Self {
        let ctx = dispatcher.context().clone();
        Self {
            modem: ctx.modem.clone(),
            duplex: ctx.config.duplex,
            mode_hang_ticks: ctx.config.mode_hang_ticks(),
            dispatcher,
            mode: HostMode::Idle,
            mode_ticks: 0,
        }
    }

    pub fn mode(&self) -> HostMode {
        self.mode
    }

    pub fn dispatcher(&self) -> &ControlDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut ControlDispatcher {
        &mut self.dispatcher
    }

    /// One frame period: drain the modem, run the dispatcher, feed the transmitter
    pub fn tick(&mut self) {
        let mut buf = [0u8; DMR_MODEM_FRAME_LENGTH_RSSI];

        for slot in SlotId::ALL {
            loop {
                let len = lock(&self.modem).read_dmr_data(slot, &mut buf);
                if len == 0 {
                    break;
                }
                self.on_modem_frame(slot, &buf[..len]);
            }
        }

        self.dispatcher.clock();

        for slot in SlotId::ALL {
            while lock(&self.modem).has_dmr_space(slot) {
                let len = self.dispatcher.read_modem_slot(slot, &mut buf);
                if len == 0 {
                    break;
                }
                // Network traffic wakes the repeater up as well
                if self.mode == HostMode::Idle {
                    self.set_mode(HostMode::Dmr);
                }
                self.mode_ticks = 0;
                lock(&self.modem).write_dmr_data(slot, &buf[..len]);
            }
        }

        if self.mode == HostMode::Dmr {
            self.mode_ticks += 1;
            if self.mode_ticks >= self.mode_hang_ticks {
                self.set_mode(HostMode::Idle);
            }
        }
    }

    fn on_modem_frame(&mut self, slot: SlotId, frame: &[u8]) {
        match self.mode {
            HostMode::Idle if self.duplex => {
                if slot == SlotId::One && self.dispatcher.process_wakeup(frame) {
                    self.set_mode(HostMode::Dmr);
                }
            }
            HostMode::Idle => {
                self.set_mode(HostMode::Dmr);
                self.dispatcher.write_modem_slot(slot, frame);
            }
            HostMode::Dmr => {
                if frame.first() == Some(&TAG_DATA) {
                    self.mode_ticks = 0;
                }
                self.dispatcher.write_modem_slot(slot, frame);
            }
        }
    }

    fn set_mode(&mut self, mode: HostMode) {
        if self.mode == mode {
            return;
        }
        tracing::info!("Mode set to {}", mode);
        self.mode = mode;
        self.mode_ticks = 0;
        if self.duplex {
            lock(&self.modem).write_dmr_start(mode == HostMode::Dmr);
        }
    }
}
