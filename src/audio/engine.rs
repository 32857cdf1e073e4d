use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::audio_api::{AudioCommand, TransportCommand};
use crate::shared::{NUM_PADS, PadConfig};

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::voice::Voice;

const VOICE_GAIN: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransportState {
    Stopped,
    Running,
    Paused,
}

// One voice slot per pad, so restarting a pad replaces its voice and the
// audio callback never allocates.
pub struct Engine {
    samples: Vec<Option<SampleBuffer>>,
    voices: [Option<Voice>; NUM_PADS],
    transport: TransportState,
    // frames rendered while running; the transport clock everyone reads.
    // Only the engine writes it.
    position: Arc<AtomicU64>,
    // bumped after each Stop has rewound `position`
    stops_acked: Arc<AtomicU64>,
}

impl Engine {
    pub fn new(position: Arc<AtomicU64>, stops_acked: Arc<AtomicU64>) -> Self {
        Self {
            samples: (0..NUM_PADS).map(|_| None).collect(),
            voices: [None; NUM_PADS],
            transport: TransportState::Stopped,
            position,
            stops_acked,
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::RegisterSample { pad, buffer } => {
                self.samples[pad.table_index()] = Some(buffer);
            }
            AudioCommand::Start { pad, at } => self.start_voice(pad, at),
            AudioCommand::Stop(pad) => self.voices[pad.table_index()] = None,
            AudioCommand::StopAll => self.voices = [None; NUM_PADS],
            AudioCommand::Transport(t) => self.handle_transport(t),
        }
    }

    fn handle_transport(&mut self, cmd: TransportCommand) {
        match cmd {
            TransportCommand::Start => self.transport = TransportState::Running,
            TransportCommand::Pause => {
                if self.transport == TransportState::Running {
                    self.transport = TransportState::Paused;
                }
            }
            TransportCommand::Resume => {
                if self.transport == TransportState::Paused {
                    self.transport = TransportState::Running;
                }
            }
            TransportCommand::Stop => {
                self.transport = TransportState::Stopped;
                self.voices = [None; NUM_PADS];
                self.position.store(0, Ordering::Release);
                self.stops_acked.fetch_add(1, Ordering::AcqRel);
            }
        }
    }

    fn start_voice(&mut self, pad: PadConfig, at: u64) {
        let idx = pad.table_index();
        if self.samples[idx].is_none() {
            return; // not registered yet
        }
        // the boundary may already be behind us; start part-way in
        let now = self.position.load(Ordering::Acquire);
        let offset = now.saturating_sub(at) as usize;
        self.voices[idx] = Some(Voice::new(offset, VOICE_GAIN));
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        if self.transport != TransportState::Running {
            return; // paused voices hold their position
        }

        for (voice, sample) in self.voices.iter_mut().zip(&self.samples) {
            let (Some(v), Some(buffer)) = (voice.as_mut(), sample.as_ref()) else {
                continue;
            };
            v.render_into(buffer, out);
            if !v.active {
                *voice = None;
            }
        }

        self.position.fetch_add(out.len() as u64, Ordering::AcqRel);
    }

    #[cfg(test)]
    fn is_sounding(&self, pad: PadConfig) -> bool {
        self.voices[pad.table_index()].is_some()
    }
}
