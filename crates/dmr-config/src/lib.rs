//! DMR repeater configuration management
//!
//! This crate provides configuration loading and parsing:
//! - TOML configuration file parsing
//! - The immutable ControlConfig shared by the dispatcher, slots and adapters

pub mod control_config;
pub mod toml_config;

pub use control_config::*;
pub use toml_config::*;
