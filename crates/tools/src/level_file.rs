use serde::{Deserialize, Serialize};
use skyline::{AcceptedLevel, Level};
use std::fs;
use std::io;
use std::path::Path;

pub const FORMAT_VERSION: u32 = 1;

/// JSON dump of one accepted level together with the inputs that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LevelFile {
    pub format_version: u32,
    pub seed: u64,
    pub difficulty: u32,
    pub attempts: u32,
    pub used_fallback: bool,
    pub fingerprint_hex: String,
    pub level: Level,
}

impl LevelFile {
    pub fn new(seed: u64, difficulty: u32, accepted: AcceptedLevel) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            seed,
            difficulty,
            attempts: accepted.attempts,
            used_fallback: accepted.used_fallback,
            fingerprint_hex: format!("0x{:016x}", accepted.level.fingerprint()),
            level: accepted.level,
        }
    }

    pub fn write_atomic(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: Self = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(file)
    }

    /// True when the stored fingerprint still matches the stored level.
    pub fn fingerprint_matches(&self) -> bool {
        self.fingerprint_hex == format!("0x{:016x}", self.level.fingerprint())
    }
}
