use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use crate::audio_api::AudioCommand;

mod engine;
mod frame;
mod sample_buffer;
mod transport;
mod voice;

pub use frame::StereoFrame;
pub use sample_buffer::SampleBuffer;
pub use transport::CpalTransport;

use engine::Engine;

// largest block we pre-size the render scratch for
const MAX_BLOCK_FRAMES: usize = 8192;

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    position: Arc<AtomicU64>,
    stops_acked: Arc<AtomicU64>,
    sample_rate: u32,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    /// Returns false if the command was dropped.
    pub fn send(&self, cmd: AudioCommand) -> bool {
        if self.tx.try_send(cmd).is_err() {
            log::warn!("audio command queue full, dropping command");
            return false;
        }
        true
    }

    /// Frames rendered since the transport last started from zero.
    pub fn position_frames(&self) -> u64 {
        self.position.load(Ordering::Acquire)
    }

    /// Transport stops the engine has handled so far.
    pub fn stops_acked(&self) -> u64 {
        self.stops_acked.load(Ordering::Acquire)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(1024);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;
    let position = Arc::new(AtomicU64::new(0));
    let stops_acked = Arc::new(AtomicU64::new(0));

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream = build_output_stream_f32(
                &device,
                &config.into(),
                rx,
                Engine::new(Arc::clone(&position), Arc::clone(&stops_acked)),
                channels,
            )?;
            output_stream.play().context("failed to play output stream")?;
            log::info!("audio output started: {sample_rate} Hz, {channels} channel(s)");

            Ok(AudioHandle {
                tx,
                position,
                stops_acked,
                sample_rate,
                _output_stream: output_stream,
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    mut engine: Engine,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let channels = channels.max(1);
    let mut scratch = vec![StereoFrame::zero(); MAX_BLOCK_FRAMES];

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            render_interleaved(&mut engine, &mut scratch, data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

// Hosts may ask for more frames than the scratch holds, so render in
// scratch-sized pieces. Nothing here allocates.
fn render_interleaved(
    engine: &mut Engine,
    scratch: &mut [StereoFrame],
    data: &mut [f32],
    channels: usize,
) {
    let channels = channels.max(1);
    let step = scratch.len().max(1) * channels;
    for chunk in data.chunks_mut(step) {
        let block = &mut scratch[..chunk.len() / channels];
        engine.render_block(block);
        for (out, frame) in chunk.chunks_exact_mut(channels).zip(block.iter()) {
            match out {
                [mono] => *mono = 0.5 * (frame.left + frame.right),
                [left, right, rest @ ..] => {
                    *left = frame.left;
                    *right = frame.right;
                    rest.fill(0.0);
                }
                [] => {}
            }
        }
    }
}
