pub use crate::audio::SampleBuffer;
use crate::shared::PadConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportCommand {
    Start,
    Pause,
    Resume,
    Stop, // silences every voice and rewinds the frame clock to 0
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files (interrupts thread), so the loader decodes
    // each pad's buffer up front and hands it over here
    RegisterSample { pad: PadConfig, buffer: SampleBuffer },

    // Start (or restart) a pad so that its frame 0 lines up with transport
    // frame `at`; a late command skips ahead instead of drifting
    Start { pad: PadConfig, at: u64 },
    Stop(PadConfig),
    StopAll,
    Transport(TransportCommand),
}

/// What the loop scheduler needs from the audio side: sample playback, a
/// transport clock, and a recurring loop boundary.
///
/// Times are seconds. `now` is transport time (stops while paused, rewinds
/// on stop); `immediate` is wall time since the transport was created.
pub trait LoopTransport {
    fn start_sample(&mut self, pad: PadConfig, at: f64);
    fn stop_sample(&mut self, pad: PadConfig);
    fn stop_all_samples(&mut self);

    fn loop_duration_seconds(&self) -> f64;
    fn now(&self) -> f64;
    fn immediate(&self) -> f64;

    /// Arm the recurring boundary at `0, period, 2 * period, ...` of
    /// transport time. Called once, after the samples are loaded.
    fn schedule_repeating(&mut self, period: f64);
    /// Boundary times crossed since the last poll, oldest first.
    fn poll_boundaries(&mut self) -> Vec<f64>;

    fn start(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);

    /// Begin loading every pad's sample in the background.
    fn load_samples(&mut self);
    /// `Some` once loading has finished, successfully or not.
    fn poll_loaded(&mut self) -> Option<anyhow::Result<()>>;
}

// absorbs float noise when `now` lands exactly on a boundary
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Steps `next` past every boundary at or before `now` and returns their
/// times. Boundary k is always `k * period`, never a running sum.
pub fn crossed_boundaries(next: &mut u64, period: f64, now: f64) -> Vec<f64> {
    let mut crossed = Vec::new();
    if period <= 0.0 {
        return crossed;
    }
    while *next as f64 * period <= now + BOUNDARY_EPSILON {
        crossed.push(*next as f64 * period);
        *next += 1;
    }
    crossed
}
