use std::path::PathBuf;
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::audio_api::{AudioCommand, LoopTransport, TransportCommand, crossed_boundaries};
use crate::config::PlayerConfig;
use crate::loader::sample_loader::{self, LoadedBank};
use crate::shared::{BEATS_PER_LOOP, PadConfig};

use super::AudioHandle;

/// Transport backed by the cpal stream. Time is the engine's rendered
/// frame count, so loop boundaries come straight off the audio clock.
pub struct CpalTransport {
    audio: AudioHandle,
    config: PlayerConfig,
    samples_dir: PathBuf,
    created: Instant,
    period: Option<f64>,
    next_boundary: u64,
    // stop commands sent; the clock is stale until the engine has seen them all
    stops_sent: u64,
    loader: Option<Receiver<anyhow::Result<LoadedBank>>>,
}

impl CpalTransport {
    pub fn new(audio: AudioHandle, samples_dir: PathBuf, config: PlayerConfig) -> Self {
        Self {
            audio,
            config,
            samples_dir,
            created: Instant::now(),
            period: None,
            next_boundary: 0,
            stops_sent: 0,
            loader: None,
        }
    }

    fn stop_pending(&self) -> bool {
        self.audio.stops_acked() < self.stops_sent
    }

    fn seconds_to_frames(&self, seconds: f64) -> u64 {
        (seconds * self.audio.sample_rate() as f64).round().max(0.0) as u64
    }
}

impl LoopTransport for CpalTransport {
    fn start_sample(&mut self, pad: PadConfig, at: f64) {
        let at = self.seconds_to_frames(at);
        self.audio.send(AudioCommand::Start { pad, at });
    }

    fn stop_sample(&mut self, pad: PadConfig) {
        self.audio.send(AudioCommand::Stop(pad));
    }

    fn stop_all_samples(&mut self) {
        self.audio.send(AudioCommand::StopAll);
    }

    fn loop_duration_seconds(&self) -> f64 {
        BEATS_PER_LOOP * 60.0 / self.config.bpm
    }

    fn now(&self) -> f64 {
        if self.stop_pending() {
            return 0.0;
        }
        self.audio.position_frames() as f64 / self.audio.sample_rate() as f64
    }

    fn immediate(&self) -> f64 {
        self.created.elapsed().as_secs_f64()
    }

    fn schedule_repeating(&mut self, period: f64) {
        self.period = Some(period);
        self.next_boundary = 0;
    }

    fn poll_boundaries(&mut self) -> Vec<f64> {
        let Some(period) = self.period else {
            return Vec::new();
        };
        if self.stop_pending() {
            return Vec::new();
        }
        let now = self.now();
        crossed_boundaries(&mut self.next_boundary, period, now)
    }

    fn start(&mut self) {
        self.audio.send(AudioCommand::Transport(TransportCommand::Start));
    }

    fn pause(&mut self) {
        self.audio.send(AudioCommand::Transport(TransportCommand::Pause));
    }

    fn resume(&mut self) {
        self.audio.send(AudioCommand::Transport(TransportCommand::Resume));
    }

    fn stop(&mut self) {
        // the engine rewinds the clock when it handles this
        if self.audio.send(AudioCommand::Transport(TransportCommand::Stop)) {
            self.stops_sent += 1;
        }
        self.next_boundary = 0;
    }

    fn load_samples(&mut self) {
        if self.loader.is_some() {
            return;
        }
        let (tx, rx) = crossbeam_channel::bounded(1);
        let dir = self.samples_dir.clone();
        let formats = self.config.formats();
        let rate = self.audio.sample_rate();
        std::thread::spawn(move || {
            let _ = tx.send(sample_loader::load_bank(&dir, &formats, rate));
        });
        self.loader = Some(rx);
    }

    fn poll_loaded(&mut self) -> Option<anyhow::Result<()>> {
        let rx = self.loader.as_ref()?;
        let result = match rx.try_recv() {
            Ok(Ok(bank)) => {
                for (pad, buffer) in bank {
                    self.audio.send(AudioCommand::RegisterSample { pad, buffer });
                }
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                Err(anyhow::anyhow!("sample loader exited without a result"))
            }
        };
        self.loader = None;
        Some(result)
    }
}
