use std::path::{Path, PathBuf};

use crate::audio::SampleBuffer;
use crate::config::{FormatOrder, SampleFormat};
use crate::shared::{PadCategory, PadConfig};

pub type LoadedBank = Vec<(PadConfig, SampleBuffer)>;

// <dir>/<ext>/<bank>.1.<n>.<ext>, n counted from 1
pub fn sample_path(dir: &Path, format: SampleFormat, pad: PadConfig) -> PathBuf {
    let ext = format.extension();
    dir.join(ext)
        .join(format!("{}.1.{}.{}", pad.category.bank_name(), pad.slot as usize + 1, ext))
}

fn decode(path: &Path, format: SampleFormat, target_rate: u32) -> anyhow::Result<SampleBuffer> {
    let buffer = match format {
        SampleFormat::Wav => SampleBuffer::load_wav(path, target_rate)?,
        SampleFormat::Mp3 => SampleBuffer::load_mp3(path, target_rate)?,
    };
    if buffer.is_empty() {
        anyhow::bail!("{} has no audio", path.display());
    }
    log::debug!("decoded {} ({} frames)", path.display(), buffer.len());
    Ok(buffer)
}

/// Load one pad, falling back to the second format if the first fails.
pub fn load_pad(
    dir: &Path,
    formats: &FormatOrder,
    pad: PadConfig,
    target_rate: u32,
) -> anyhow::Result<SampleBuffer> {
    let primary = sample_path(dir, formats.primary, pad);
    let first_err = match decode(&primary, formats.primary, target_rate) {
        Ok(buffer) => return Ok(buffer),
        Err(e) => e,
    };

    let fallback = sample_path(dir, formats.fallback, pad);
    log::warn!(
        "couldn't load {} [{first_err:#}], trying {}",
        primary.display(),
        fallback.display()
    );
    decode(&fallback, formats.fallback, target_rate).map_err(|e| {
        anyhow::anyhow!(
            "no usable sample for {:?} {}: {} [{first_err:#}], {} [{e:#}]",
            pad.category,
            pad.slot,
            primary.display(),
            fallback.display()
        )
    })
}

/// Load every pad of every bank. Any pad that fails both formats fails
/// the whole bank.
pub fn load_bank(dir: &Path, formats: &FormatOrder, target_rate: u32) -> anyhow::Result<LoadedBank> {
    log::info!("loading samples from {}", dir.display());
    let mut bank = Vec::new();
    for category in PadCategory::ALL {
        for slot in 0..category.bank_size() {
            let pad = PadConfig { category, slot: slot as u8 };
            bank.push((pad, load_pad(dir, formats, pad, target_rate)?));
        }
    }
    log::info!("loaded {} samples", bank.len());
    Ok(bank)
}
