#![allow(dead_code)]

pub mod bench;
pub mod fakes;
pub mod log_capture;
pub mod recording_slot;

pub use bench::{Bench, REPEATER_ID, default_test_config, wakeup_frame};
pub use fakes::{FakeDisplay, FakeModem, FakeNetwork};
pub use log_capture::{CapturedEvent, capture_logs, count_level};
pub use recording_slot::{RecordingSlot, SlotEvent};
