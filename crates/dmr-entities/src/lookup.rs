//! Mapping of DMR ids to callsigns, used for logging and display

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use dmr_core::{BS_ID_ANY, DmrId};

/// Resolves a numeric id to something a human can read. Never fails.
pub trait IdentityLookup: Send + Sync {
    fn find(&self, id: DmrId) -> String;
}

#[derive(Debug, Default)]
pub struct DmrIdLookup {
    table: HashMap<DmrId, String>,
}

impl DmrIdLookup {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses `id callsign [anything else]` lines. Blank lines, `#` comments and lines
    /// without a numeric id are skipped.
    pub fn from_reader<R: Read>(reader: R) -> std::io::Result<Self> {
        let mut table = HashMap::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split(|c: char| c.is_whitespace() || c == ',' || c == ';').filter(|f| !f.is_empty());
            let (Some(id), Some(callsign)) = (fields.next(), fields.next()) else {
                continue;
            };
            let Ok(id) = id.parse::<DmrId>() else {
                continue;
            };
            table.insert(id, callsign.to_uppercase());
        }

        tracing::info!("Loaded {} ids into the lookup table", table.len());
        Ok(Self { table })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let f = File::open(path)?;
        Self::from_reader(f)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl IdentityLookup for DmrIdLookup {
    fn find(&self, id: DmrId) -> String {
        if id == BS_ID_ANY {
            return "ALL".to_string();
        }
        match self.table.get(&id) {
            Some(callsign) => callsign.clone(),
            None => id.to_string(),
        }
    }
}
