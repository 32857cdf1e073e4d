// Purely for testing: a transport with a hand-cranked clock that records
// every call the scheduler makes.

use crate::audio_api::{LoopTransport, crossed_boundaries};
use crate::shared::PadConfig;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    StartSample(PadConfig, f64),
    StopSample(PadConfig),
    StopAll,
    TransportStart,
    Pause,
    Resume,
    TransportStop,
    Schedule(f64),
    Load,
}

pub struct FakeTransport {
    pub calls: Vec<Call>,
    loop_duration: f64,
    position: f64,
    wall: f64,
    running: bool,
    paused: bool,
    period: Option<f64>,
    next_boundary: u64,
    load_result: Option<anyhow::Result<()>>,
}

impl FakeTransport {
    pub fn new(loop_duration: f64) -> Self {
        Self {
            calls: Vec::new(),
            loop_duration,
            position: 0.0,
            wall: 0.0,
            running: false,
            paused: false,
            period: None,
            next_boundary: 0,
            load_result: None,
        }
    }

    /// Move wall time forward; transport time follows only while running.
    pub fn advance(&mut self, seconds: f64) {
        self.wall += seconds;
        if self.running && !self.paused {
            self.position += seconds;
        }
    }

    pub fn finish_loading(&mut self) {
        self.load_result = Some(Ok(()));
    }

    pub fn fail_loading(&mut self, reason: &str) {
        self.load_result = Some(Err(anyhow::anyhow!("{reason}")));
    }

    pub fn started(&self) -> Vec<(PadConfig, f64)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::StartSample(pad, at) => Some((*pad, *at)),
                _ => None,
            })
            .collect()
    }
}

impl LoopTransport for FakeTransport {
    fn start_sample(&mut self, pad: PadConfig, at: f64) {
        self.calls.push(Call::StartSample(pad, at));
    }

    fn stop_sample(&mut self, pad: PadConfig) {
        self.calls.push(Call::StopSample(pad));
    }

    fn stop_all_samples(&mut self) {
        self.calls.push(Call::StopAll);
    }

    fn loop_duration_seconds(&self) -> f64 {
        self.loop_duration
    }

    fn now(&self) -> f64 {
        self.position
    }

    fn immediate(&self) -> f64 {
        self.wall
    }

    fn schedule_repeating(&mut self, period: f64) {
        self.calls.push(Call::Schedule(period));
        self.period = Some(period);
        self.next_boundary = 0;
    }

    fn poll_boundaries(&mut self) -> Vec<f64> {
        let Some(period) = self.period else {
            return Vec::new();
        };
        crossed_boundaries(&mut self.next_boundary, period, self.position)
    }

    fn start(&mut self) {
        self.calls.push(Call::TransportStart);
        self.running = true;
        self.paused = false;
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        self.paused = true;
    }

    fn resume(&mut self) {
        self.calls.push(Call::Resume);
        self.paused = false;
    }

    fn stop(&mut self) {
        self.calls.push(Call::TransportStop);
        self.running = false;
        self.paused = false;
        self.position = 0.0;
        self.next_boundary = 0;
    }

    fn load_samples(&mut self) {
        self.calls.push(Call::Load);
    }

    fn poll_loaded(&mut self) -> Option<anyhow::Result<()>> {
        self.load_result.take()
    }
}
