use clap::Parser;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dmr_config::{ControlConfig, toml_config};
use dmr_core::{DMR_FRAME_PERIOD_MS, debug};
use dmr_entities::modem::udp_modem::UdpModem;
use dmr_entities::network::homebrew::HomebrewNetwork;
use dmr_entities::{
    ControlDeps, ControlDispatcher, DmrIdLookup, DmrModem, DmrNetwork, IdentityLookup, LogDisplay, RepeaterHost,
};

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> Arc<ControlConfig> {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            println!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

fn load_lookup(cfg: &ControlConfig) -> Arc<dyn IdentityLookup> {
    let Some(path) = &cfg.lookup.file else {
        return Arc::new(DmrIdLookup::empty());
    };
    match DmrIdLookup::from_file(path) {
        Ok(lookup) => Arc::new(lookup),
        Err(e) => {
            tracing::warn!("Failed to load DMR ids from {}: {}, showing plain ids", path, e);
            Arc::new(DmrIdLookup::empty())
        }
    }
}

/// Wire adapters, dispatcher and host together
fn build_repeater(cfg: Arc<ControlConfig>) -> Result<RepeaterHost, Box<dyn std::error::Error>> {
    let Some(modem_cfg) = &cfg.modem else {
        return Err("no [modem] section in config".into());
    };
    let modem: Arc<Mutex<dyn DmrModem>> = Arc::new(Mutex::new(UdpModem::new(modem_cfg)?));

    let network: Option<Arc<Mutex<dyn DmrNetwork>>> = match &cfg.network {
        Some(net_cfg) => {
            let net = HomebrewNetwork::new(cfg.id, net_cfg)?;
            eprintln!(" -> Homebrew network enabled");
            Some(Arc::new(Mutex::new(net)))
        }
        None => None,
    };

    let deps = ControlDeps {
        modem,
        network,
        display: Arc::new(LogDisplay),
        lookup: load_lookup(&cfg),
    };
    let dispatcher = ControlDispatcher::with_relay_slots(cfg, deps)?;
    Ok(RepeaterHost::new(dispatcher))
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "DMR repeater controller",
    long_about = "Runs a DMR repeater controller using the provided TOML configuration file"
)]
struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with repeater, modem and network parameters")]
    config: String,
}

fn main() {
    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let _log_guard = debug::setup_logging_default(cfg.debug_log.clone());

    let mut host = match build_repeater(cfg) {
        Ok(host) => host,
        Err(e) => {
            tracing::error!("Failed to start repeater: {}", e);
            std::process::exit(1);
        }
    };

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        tracing::warn!("failed to set Ctrl+C handler: {}", e);
    }

    let period = Duration::from_millis(DMR_FRAME_PERIOD_MS);
    let mut next = Instant::now() + period;
    while running.load(Ordering::SeqCst) {
        host.tick();

        let now = Instant::now();
        if next > now {
            std::thread::sleep(next - now);
            next += period;
        } else {
            // Fell behind, don't try to catch up
            next = now + period;
        }
    }

    tracing::info!("Shutting down");
    // host drops here → adapters drop their channels → worker threads stop
}
