// The loop state machine. User requests land in `queued`; at every loop
// boundary the queue is merged into `current`, every current pad is
// (re)started in sync with the boundary, and subscribers hear about it.
// `current` only changes at a boundary, on an immediate stop, or on stop().

use crate::audio_api::LoopTransport;
use crate::pipeline::merge::{merge_pad, merge_state};
use crate::pipeline::observers::{BoundaryEvent, ObserverRegistry, StateChange, SubscriptionToken};
use crate::pipeline::pad_state::SamplePadState;
use crate::shared::{Lifecycle, PadConfig};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

pub struct LoopScheduler<T: LoopTransport> {
    transport: T,
    current: SamplePadState,
    queued: SamplePadState,
    lifecycle: Lifecycle,
    init: InitState,
    // requests that arrived before the samples finished loading
    parked: Vec<PadConfig>,
    immediate_stop: bool,
    boundary_observers: ObserverRegistry<BoundaryEvent>,
    state_observers: ObserverRegistry<StateChange>,
}

impl<T: LoopTransport> LoopScheduler<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            current: SamplePadState::new(),
            queued: SamplePadState::new(),
            lifecycle: Lifecycle::Idle,
            init: InitState::Uninitialized,
            parked: Vec::new(),
            immediate_stop: false,
            boundary_observers: ObserverRegistry::new("boundary observers"),
            state_observers: ObserverRegistry::new("state observers"),
        }
    }

    // -- snapshots --

    pub fn current(&self) -> SamplePadState {
        self.current.clone()
    }

    pub fn queued(&self) -> SamplePadState {
        self.queued.clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn init_state(&self) -> &InitState {
        &self.init
    }

    pub fn parked(&self) -> &[PadConfig] {
        &self.parked
    }

    pub fn immediate_stop(&self) -> bool {
        self.immediate_stop
    }

    pub fn set_immediate_stop(&mut self, enabled: bool) {
        self.immediate_stop = enabled;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// How far through the current loop the transport is, 0.0..1.0.
    pub fn loop_progress(&self) -> f64 {
        let duration = self.transport.loop_duration_seconds();
        match self.lifecycle {
            Lifecycle::Playing | Lifecycle::Paused if duration > 0.0 => {
                (self.transport.now() / duration).fract().clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    // -- subscriptions --

    pub fn subscribe_boundary(
        &mut self,
        observer: impl FnMut(&BoundaryEvent) + 'static,
    ) -> SubscriptionToken<BoundaryEvent> {
        self.boundary_observers.subscribe(observer)
    }

    pub fn unsubscribe_boundary(&mut self, token: SubscriptionToken<BoundaryEvent>) {
        self.boundary_observers.unsubscribe(token);
    }

    pub fn subscribe_state(
        &mut self,
        observer: impl FnMut(&StateChange) + 'static,
    ) -> SubscriptionToken<StateChange> {
        self.state_observers.subscribe(observer)
    }

    pub fn unsubscribe_state(&mut self, token: SubscriptionToken<StateChange>) {
        self.state_observers.unsubscribe(token);
    }

    // -- user intent --

    /// The single entry point for pad clicks.
    pub fn request_pad(&mut self, pad: PadConfig) {
        if !pad.is_valid() {
            log::warn!("ignoring out-of-range pad {pad:?}");
            return;
        }

        match &self.init {
            InitState::Ready => {}
            InitState::Uninitialized => {
                log::info!("first request, loading samples");
                self.init = InitState::Loading;
                self.transport.load_samples();
                self.parked.push(pad);
                return;
            }
            InitState::Loading => {
                self.parked.push(pad);
                return;
            }
            InitState::Failed(reason) => {
                log::warn!("samples failed to load ({reason}), ignoring {pad:?}");
                return;
            }
        }

        if self.immediate_stop && self.current.contains(&pad) {
            self.stop_immediately(pad);
            return;
        }

        self.queued = merge_pad(&self.queued, pad);
        if matches!(self.lifecycle, Lifecycle::Idle | Lifecycle::Stopped) {
            log::info!("{:?} -> Playing", self.lifecycle);
            self.lifecycle = Lifecycle::Playing;
            self.transport.start();
        }
        self.publish_state();
    }

    pub fn pause(&mut self) {
        if self.lifecycle != Lifecycle::Playing {
            log::debug!("pause ignored while {:?}", self.lifecycle);
            return;
        }
        self.transport.pause();
        self.lifecycle = Lifecycle::Paused;
        self.publish_state();
    }

    pub fn resume(&mut self) {
        if self.lifecycle != Lifecycle::Paused {
            log::debug!("resume ignored while {:?}", self.lifecycle);
            return;
        }
        self.transport.resume();
        self.lifecycle = Lifecycle::Playing;
        self.publish_state();
    }

    /// Clears both states, silences everything and rewinds the transport.
    pub fn stop(&mut self) {
        if !matches!(self.lifecycle, Lifecycle::Playing | Lifecycle::Paused) {
            log::debug!("stop ignored while {:?}", self.lifecycle);
            return;
        }
        self.current.clear();
        self.queued.clear();
        self.parked.clear();
        self.transport.stop_all_samples();
        self.transport.stop();
        self.lifecycle = Lifecycle::Stopped;
        log::info!("stopped");
        self.publish_state();
    }

    // -- clock --

    /// Drive the scheduler from the host loop: finish a pending load, then
    /// run every loop boundary the transport has crossed.
    pub fn tick(&mut self) {
        self.poll_init();
        if self.lifecycle != Lifecycle::Playing {
            return;
        }
        for time in self.transport.poll_boundaries() {
            self.on_boundary(time);
            if self.lifecycle != Lifecycle::Playing {
                break;
            }
        }
    }

    fn poll_init(&mut self) {
        if self.init != InitState::Loading {
            return;
        }
        let Some(result) = self.transport.poll_loaded() else {
            return;
        };
        match result {
            Ok(()) => {
                log::info!("samples loaded, replaying {} queued request(s)", self.parked.len());
                self.init = InitState::Ready;
                let period = self.transport.loop_duration_seconds();
                self.transport.schedule_repeating(period);
                for pad in std::mem::take(&mut self.parked) {
                    self.request_pad(pad);
                }
            }
            Err(e) => {
                log::error!("sample loading failed: {e:#}");
                if !self.parked.is_empty() {
                    log::warn!("dropping {} request(s) made while loading", self.parked.len());
                }
                self.parked.clear();
                self.init = InitState::Failed(format!("{e:#}"));
            }
        }
    }

    fn on_boundary(&mut self, time: f64) {
        let previous = std::mem::take(&mut self.current);
        self.current = merge_state(&self.queued, &previous);
        self.queued.clear();

        for pad in previous.iter().filter(|p| !self.current.contains(p)) {
            self.transport.stop_sample(*pad);
        }
        // pads that stay are restarted too, in step with the new loop
        for pad in self.current.iter() {
            self.transport.start_sample(*pad, time);
        }

        debug_assert!(self.current.is_well_formed());
        log::debug!(
            "boundary at {time:.3}s: {} pad(s) playing, {} observer(s)",
            self.current.len(),
            self.boundary_observers.len()
        );

        let event = BoundaryEvent {
            current: self.current.clone(),
            time,
            loop_duration: self.transport.loop_duration_seconds(),
        };
        self.boundary_observers.notify(&event);

        if self.current.is_empty() {
            log::info!("loop emptied, Playing -> Idle");
            self.transport.stop();
            self.lifecycle = Lifecycle::Idle;
        }
        self.publish_state();
    }

    fn stop_immediately(&mut self, pad: PadConfig) {
        self.transport.stop_sample(pad);
        self.current.remove(&pad);
        if self.current.is_empty() && self.queued.is_empty() {
            self.transport.stop();
            self.lifecycle = Lifecycle::Idle;
        }
        self.publish_state();
    }

    fn publish_state(&mut self) {
        let change = StateChange {
            current: self.current.clone(),
            queued: self.queued.clone(),
            lifecycle: self.lifecycle,
        };
        self.state_observers.notify(&change);
    }
}
