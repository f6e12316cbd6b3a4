//! Core utilities for the DMR repeater
//!
//! This crate provides fundamental types and utilities used across the repeater:
//! - Frame tag, sync and data type constants
//! - SlotId for the two TDMA timeslots
//! - DmrData, the network-side frame representation
//! - PDU parse errors and logging setup

pub mod debug;
pub mod defines;
pub mod dmr_data;
pub mod pdu_parse_error;
pub mod slot_id;
pub mod traffic_source;

// Re-export commonly used items
pub use defines::*;
pub use dmr_data::{DmrData, Flco};
pub use pdu_parse_error::PduParseErr;
pub use slot_id::SlotId;
pub use traffic_source::TrafficSource;

/// Numeric DMR identity of a radio, talkgroup or repeater. 24 bits on air, 32 bits for repeaters.
pub type DmrId = u32;
