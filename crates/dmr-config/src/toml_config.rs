use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use toml::Value;

use super::control_config::{
    CfgAccessLists, CfgDstIdList, CfgLookup, CfgModem, CfgNetwork, CfgRewrite, CfgRssi, ControlConfig,
    default_call_hang, default_jitter_ms,
};

/// Build the shared `ControlConfig` from a TOML configuration string
pub fn from_toml_str(toml_str: &str) -> Result<Arc<ControlConfig>, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if !root.general.extra.is_empty() {
        return Err(format!("Unrecognized fields in general: {:?}", sorted_keys(&root.general.extra)).into());
    }
    if let Some(ref dmr) = root.dmr {
        if !dmr.extra.is_empty() {
            return Err(format!("Unrecognized fields in dmr: {:?}", sorted_keys(&dmr.extra)).into());
        }
        for (name, list) in [
            ("slot1_rf", &dmr.slot1_rf),
            ("slot2_rf", &dmr.slot2_rf),
            ("slot1_net", &dmr.slot1_net),
            ("slot2_net", &dmr.slot2_net),
        ] {
            if let Some(list) = list {
                if !list.extra.is_empty() {
                    return Err(format!("Unrecognized fields: dmr.{}::{:?}", name, sorted_keys(&list.extra)).into());
                }
            }
        }
    }
    if let Some(ref rssi) = root.rssi {
        if !rssi.extra.is_empty() {
            return Err(format!("Unrecognized fields in rssi: {:?}", sorted_keys(&rssi.extra)).into());
        }
    }
    if let Some(ref lookup) = root.lookup {
        if !lookup.extra.is_empty() {
            return Err(format!("Unrecognized fields in lookup: {:?}", sorted_keys(&lookup.extra)).into());
        }
    }
    if let Some(ref modem) = root.modem {
        if !modem.extra.is_empty() {
            return Err(format!("Unrecognized fields in modem: {:?}", sorted_keys(&modem.extra)).into());
        }
    }
    if let Some(ref network) = root.network {
        if !network.extra.is_empty() {
            return Err(format!("Unrecognized fields in network: {:?}", sorted_keys(&network.extra)).into());
        }
    }

    // Build config from required and optional values
    let mut cfg = ControlConfig::new(root.general.id, 0);
    cfg.debug_log = root.debug_log;
    apply_general_patch(&mut cfg, root.general);

    if let Some(dmr) = root.dmr {
        apply_dmr_patch(&mut cfg, dmr);
    }

    if let Some(rssi) = root.rssi {
        cfg.rssi = CfgRssi {
            multiplier: rssi.multiplier.unwrap_or(cfg.rssi.multiplier),
            offset: rssi.offset.unwrap_or(cfg.rssi.offset),
        };
    }

    if let Some(lookup) = root.lookup {
        cfg.lookup = CfgLookup { file: lookup.file };
    }

    cfg.modem = root.modem.map(|m| CfgModem {
        local_addr: m.local_addr,
        remote_addr: m.remote_addr,
    });

    cfg.network = root.network.and_then(|n| {
        if n.enabled.unwrap_or(true) {
            Some(CfgNetwork {
                local_addr: n.local_addr,
                remote_addr: n.remote_addr,
            })
        } else {
            None
        }
    });

    cfg.validate().map_err(|e| format!("Invalid configuration: {}", e))?;
    Ok(Arc::new(cfg))
}

/// Build the shared `ControlConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<Arc<ControlConfig>, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build the shared `ControlConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Arc<ControlConfig>, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    from_reader(f)
}

fn apply_general_patch(dst: &mut ControlConfig, src: GeneralDto) {
    if let Some(v) = src.duplex {
        dst.duplex = v;
    }
    if let Some(v) = src.timeout {
        dst.timeout = v;
    }
    if let Some(v) = src.mode_hang {
        dst.mode_hang = v;
    }
}

fn apply_dmr_patch(dst: &mut ControlConfig, src: DmrDto) {
    dst.color_code = src.color_code;
    dst.call_hang = src.call_hang.unwrap_or_else(default_call_hang);
    dst.jitter_ms = src.jitter.unwrap_or_else(default_jitter_ms);

    dst.rewrite = CfgRewrite {
        tg_rewrite_slot1: src.tg_rewrite_slot1.unwrap_or(false),
        tg_rewrite_slot2: src.tg_rewrite_slot2.unwrap_or(false),
        bm_auto_rewrite: src.bm_auto_rewrite.unwrap_or(false),
        bm_rewrite_reflector_voice_prompts: src.bm_rewrite_reflector_voice_prompts.unwrap_or(false),
    };

    dst.access = CfgAccessLists {
        self_only: src.self_only.unwrap_or(false),
        prefixes: src.prefixes,
        src_blacklist: src.blacklist,
        slot1_rf: dst_list(src.slot1_rf),
        slot2_rf: dst_list(src.slot2_rf),
        slot1_net: dst_list(src.slot1_net),
        slot2_net: dst_list(src.slot2_net),
    };
}

fn dst_list(src: Option<DstIdListDto>) -> CfgDstIdList {
    match src {
        Some(l) => CfgDstIdList {
            blacklist: l.blacklist,
            whitelist: l.whitelist,
        },
        None => CfgDstIdList::default(),
    }
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    general: GeneralDto,

    #[serde(default)]
    dmr: Option<DmrDto>,

    #[serde(default)]
    rssi: Option<RssiDto>,

    #[serde(default)]
    lookup: Option<LookupDto>,

    #[serde(default)]
    modem: Option<ModemDto>,

    #[serde(default)]
    network: Option<NetworkDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct GeneralDto {
    pub id: u32,
    pub duplex: Option<bool>,
    pub timeout: Option<u32>,
    pub mode_hang: Option<u32>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct DmrDto {
    pub color_code: u8,
    pub call_hang: Option<u32>,
    pub jitter: Option<u32>,

    pub self_only: Option<bool>,
    #[serde(default)]
    pub prefixes: Vec<u32>,
    #[serde(default)]
    pub blacklist: Vec<u32>,

    pub tg_rewrite_slot1: Option<bool>,
    pub tg_rewrite_slot2: Option<bool>,
    pub bm_auto_rewrite: Option<bool>,
    pub bm_rewrite_reflector_voice_prompts: Option<bool>,

    #[serde(default)]
    pub slot1_rf: Option<DstIdListDto>,
    #[serde(default)]
    pub slot2_rf: Option<DstIdListDto>,
    #[serde(default)]
    pub slot1_net: Option<DstIdListDto>,
    #[serde(default)]
    pub slot2_net: Option<DstIdListDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct DstIdListDto {
    #[serde(default)]
    pub blacklist: Vec<u32>,
    #[serde(default)]
    pub whitelist: Vec<u32>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct RssiDto {
    pub multiplier: Option<i32>,
    pub offset: Option<i32>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct LookupDto {
    pub file: Option<String>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct ModemDto {
    pub local_addr: String,
    pub remote_addr: String,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct NetworkDto {
    pub enabled: Option<bool>,
    pub local_addr: String,
    pub remote_addr: String,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}
