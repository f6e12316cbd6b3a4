//! DMR protocol data units
//!
//! - CSBK control blocks and the BPTC(196,96) / CRC coding protecting them
//! - Full link control from voice headers and terminators
//! - Homebrew DMRD network packets
//! - MMDVM modem framing

pub mod components;
pub mod csbk;
pub mod lc;
pub mod modem;
pub mod network;
