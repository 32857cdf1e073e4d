use std::path::Path;

use anyhow::Context;

use super::frame::StereoFrame;

#[derive(Clone, Debug)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>, // the audio data array, at the engine's rate
}

impl SampleBuffer {
    // Load a WAV file from disk into the sample buffer
    pub fn load_wav(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader // float, just pass it through
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => { // int, convert to float
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Self::from_interleaved(&samples, spec.channels as usize, spec.sample_rate, target_rate)
    }

    // Decode an MP3 file; used when the WAV copy of a sample is missing or broken
    pub fn load_mp3(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let mut decoder = minimp3::Decoder::new(std::io::BufReader::new(file));
        let mut samples = Vec::new();
        let mut channels = 0usize;
        let mut file_rate = 0u32;

        loop {
            match decoder.next_frame() {
                Ok(frame) => {
                    channels = frame.channels;
                    file_rate = frame.sample_rate as u32;
                    samples.extend(frame.data.iter().map(|&s| s as f32 / 32768.0));
                }
                Err(minimp3::Error::Eof) => break,
                Err(e) => anyhow::bail!("MP3 decode error in {}: {:?}", path.display(), e),
            }
        }
        if samples.is_empty() {
            anyhow::bail!("{} decoded to 0 samples", path.display());
        }

        Self::from_interleaved(&samples, channels, file_rate, target_rate)
    }

    // Interleaved samples -> stereo frames at `target_rate`. Mono is
    // duplicated, anything past two channels is dropped.
    pub fn from_interleaved(
        samples: &[f32],
        channels: usize,
        source_rate: u32,
        target_rate: u32,
    ) -> anyhow::Result<Self> {
        if channels == 0 || source_rate == 0 {
            anyhow::bail!("invalid stream: {channels} channel(s) at {source_rate} Hz");
        }
        let frames: Vec<StereoFrame> = if channels == 1 {
            samples.iter().map(|&x| StereoFrame::mono(x)).collect()
        } else {
            samples
                .chunks_exact(channels)
                .map(|c| StereoFrame { left: c[0], right: c[1] })
                .collect()
        };

        Ok(Self { data: resample_linear(&frames, source_rate, target_rate) })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        // fractional position in the source buffer
        let src_pos = i as f64 / ratio; // ex. 3.7
        let idx = src_pos.floor() as usize; // ex. 3
        let frac = (src_pos - idx as f64) as f32; // ex. 0.7
        if idx >= frames.len().saturating_sub(1) { // edge case
            out.push(*frames.last().unwrap_or(&StereoFrame::zero()));
        } else {
            let a = frames[idx];
            let b = frames[idx + 1];
            out.push(StereoFrame {
                left: a.left * (1.0 - frac) + b.left * frac,
                right: a.right * (1.0 - frac) + b.right * frac,
            });
        }
    }
    out
}
