// Read once on startup from the sample directory; nothing is written back
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "padloop.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    Wav,
    Mp3,
}

impl SampleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SampleFormat::Wav => "wav",
            SampleFormat::Mp3 => "mp3",
        }
    }
}

/// Which encoding to try first, and which to fall back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatOrder {
    pub primary: SampleFormat,
    pub fallback: SampleFormat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub bpm: f64,
    pub immediate_stop: bool,
    pub primary_format: SampleFormat,
    pub fallback_format: SampleFormat,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            bpm: 110.0,
            immediate_stop: false,
            primary_format: SampleFormat::Wav,
            fallback_format: SampleFormat::Mp3,
        }
    }
}

impl PlayerConfig {
    pub fn formats(&self) -> FormatOrder {
        FormatOrder { primary: self.primary_format, fallback: self.fallback_format }
    }
}

// <samples_dir>/padloop.json
fn config_file_path(samples_dir: &Path) -> PathBuf {
    samples_dir.join(CONFIG_FILE)
}

/// Missing file means defaults; a file that doesn't parse is an error.
pub fn load_config(samples_dir: &Path) -> anyhow::Result<PlayerConfig> {
    let path = config_file_path(samples_dir);
    if !path.exists() {
        return Ok(PlayerConfig::default());
    }
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: PlayerConfig = serde_json::from_str(&data)
        .with_context(|| format!("parsing {}", path.display()))?;
    if !(config.bpm.is_finite() && config.bpm > 0.0) {
        anyhow::bail!("{}: bpm must be positive, got {}", path.display(), config.bpm);
    }
    Ok(config)
}
