// The middle layer: owns the scheduler, turns semantic input events into
// scheduler calls, and builds the DisplayState the TUI draws each frame.
// The TUI never touches scheduler state directly.

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio_api::LoopTransport;
use crate::pipeline::grid_map::grid_index_to_pad;
use crate::pipeline::{
    BoundaryEvent, InitState, LoopScheduler, SamplePadState, StateChange, SubscriptionToken,
};
use crate::shared::{CellView, DisplayState, InputEvent, LedState, Lifecycle, NUM_CELLS, PadCategory};

// the category label pulses this many times per loop
const PULSES_PER_LOOP: f64 = 8.0;
// fraction of each pulse the label stays lit
const PULSE_WIDTH: f64 = 0.25;
// queued pads flash on and off this often, in seconds
const BLINK_HALF_PERIOD: f64 = 0.25;

fn blink_phase(wall_seconds: f64) -> bool {
    (wall_seconds / BLINK_HALF_PERIOD) as u64 % 2 == 0
}

// what the subscriptions have told us so far
#[derive(Debug)]
struct ViewModel {
    current: SamplePadState,
    queued: SamplePadState,
    lifecycle: Lifecycle,
    last_boundary: Option<(f64, f64)>, // (transport time, loop duration)
}

pub struct Middle<T: LoopTransport> {
    scheduler: LoopScheduler<T>,
    view: Rc<RefCell<ViewModel>>,
    state_token: SubscriptionToken<StateChange>,
    boundary_token: SubscriptionToken<BoundaryEvent>,
}

impl<T: LoopTransport> Middle<T> {
    pub fn new(mut scheduler: LoopScheduler<T>) -> Self {
        let view = Rc::new(RefCell::new(ViewModel {
            current: scheduler.current(),
            queued: scheduler.queued(),
            lifecycle: scheduler.lifecycle(),
            last_boundary: None,
        }));

        let v = Rc::clone(&view);
        let state_token = scheduler.subscribe_state(move |change| {
            let mut v = v.borrow_mut();
            v.current = change.current.clone();
            v.queued = change.queued.clone();
            v.lifecycle = change.lifecycle;
            if change.lifecycle != Lifecycle::Playing && change.lifecycle != Lifecycle::Paused {
                v.last_boundary = None;
            }
        });
        let v = Rc::clone(&view);
        let boundary_token = scheduler.subscribe_boundary(move |event| {
            v.borrow_mut().last_boundary = Some((event.time, event.loop_duration));
        });

        Self { scheduler, view, state_token, boundary_token }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::RequestCell(cell) if (cell as usize) < NUM_CELLS => {
                self.scheduler.request_pad(grid_index_to_pad(cell as usize));
            }
            InputEvent::RequestCell(cell) => log::warn!("no grid cell {cell}"),
            InputEvent::TogglePause => match self.scheduler.lifecycle() {
                Lifecycle::Playing => self.scheduler.pause(),
                Lifecycle::Paused => self.scheduler.resume(),
                _ => {}
            },
            InputEvent::Stop => self.scheduler.stop(),
            InputEvent::ToggleImmediateStop => {
                let enabled = !self.scheduler.immediate_stop();
                self.scheduler.set_immediate_stop(enabled);
                log::info!("immediate stop {}", if enabled { "on" } else { "off" });
            }
            InputEvent::Quit => {}
        }
    }

    pub fn tick(&mut self) {
        self.scheduler.tick();
    }

    pub fn display_state(&self) -> DisplayState {
        let view = self.view.borrow();
        let parked = self.scheduler.parked();

        let cells = std::array::from_fn(|index| {
            let pad = grid_index_to_pad(index);
            let led = if view.current.contains(&pad) {
                LedState::OnHigh
            } else if view.queued.contains(&pad) || parked.contains(&pad) {
                LedState::Blink
            } else {
                LedState::Off
            };
            CellView { pad, led }
        });

        let beat_on = match view.last_boundary {
            Some((time, duration)) if duration > 0.0 => {
                let elapsed = (self.scheduler.transport().now() - time).max(0.0);
                (elapsed / (duration / PULSES_PER_LOOP)).fract() < PULSE_WIDTH
            }
            _ => false,
        };
        let pulse = PadCategory::ALL.map(|c| beat_on && !view.current.list(c).is_empty());

        DisplayState {
            cells,
            lifecycle: view.lifecycle,
            immediate_stop: self.scheduler.immediate_stop(),
            loop_progress: self.scheduler.loop_progress(),
            pulse,
            blink_on: blink_phase(self.scheduler.transport().immediate()),
            status_text: self.status_text(view.lifecycle),
        }
    }

    fn status_text(&self, lifecycle: Lifecycle) -> String {
        match self.scheduler.init_state() {
            InitState::Uninitialized => "Click on a square to begin!".to_string(),
            InitState::Loading => "loading samples...".to_string(),
            InitState::Failed(reason) => format!("couldn't load samples: {reason}"),
            InitState::Ready => match lifecycle {
                Lifecycle::Idle => "Click on a square to begin!".to_string(),
                Lifecycle::Playing => "playing".to_string(),
                Lifecycle::Paused => "paused".to_string(),
                Lifecycle::Stopped => "stopped".to_string(),
            },
        }
    }

    /// Silence everything and detach the view before exit.
    pub fn shutdown(mut self) {
        self.scheduler.stop();
        self.scheduler.unsubscribe_state(self.state_token);
        self.scheduler.unsubscribe_boundary(self.boundary_token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_fixture::FakeTransport;
    use crate::shared::PadConfig;

    const LOOP: f64 = 8.0;

    fn middle() -> Middle<FakeTransport> {
        Middle::new(LoopScheduler::new(FakeTransport::new(LOOP)))
    }

    fn loaded(m: &mut Middle<FakeTransport>) {
        m.scheduler.transport_mut().finish_loading();
        m.tick();
    }

    #[test]
    fn click_blinks_while_loading_then_lights() {
        let mut m = middle();
        m.handle_input(InputEvent::RequestCell(4)); // sounds 0
        let ds = m.display_state();
        assert_eq!(ds.cells[4].led, LedState::Blink);
        assert_eq!(ds.status_text, "loading samples...");

        loaded(&mut m);
        let ds = m.display_state();
        assert_eq!(ds.cells[4].pad, PadConfig { category: PadCategory::Sounds, slot: 0 });
        assert_eq!(ds.cells[4].led, LedState::OnHigh);
        assert_eq!(ds.lifecycle, Lifecycle::Playing);
        assert_eq!(ds.cells.iter().filter(|c| c.led != LedState::Off).count(), 1);
    }

    #[test]
    fn queued_cell_blinks_until_boundary() {
        let mut m = middle();
        m.handle_input(InputEvent::RequestCell(0));
        loaded(&mut m);
        m.handle_input(InputEvent::RequestCell(35));
        assert_eq!(m.display_state().cells[35].led, LedState::Blink);

        m.scheduler.transport_mut().advance(LOOP);
        m.tick();
        assert_eq!(m.display_state().cells[35].led, LedState::OnHigh);
    }

    #[test]
    fn pulse_follows_the_beat() {
        let mut m = middle();
        m.handle_input(InputEvent::RequestCell(0)); // bass 0
        loaded(&mut m);
        assert_eq!(m.display_state().pulse, [true, false, false]);

        m.scheduler.transport_mut().advance(LOOP / PULSES_PER_LOOP / 2.0);
        assert_eq!(m.display_state().pulse, [false, false, false]);
    }

    #[test]
    fn queued_pads_blink_on_wall_time_even_while_loading() {
        let mut m = middle();
        m.handle_input(InputEvent::RequestCell(0));
        assert!(m.display_state().blink_on);

        // transport isn't running yet, only wall time moves
        m.scheduler.transport_mut().advance(BLINK_HALF_PERIOD);
        assert_eq!(m.scheduler.transport().now(), 0.0);
        assert!(!m.display_state().blink_on);

        m.scheduler.transport_mut().advance(BLINK_HALF_PERIOD);
        assert!(m.display_state().blink_on);
    }

    #[test]
    fn pause_toggles_and_stop_clears() {
        let mut m = middle();
        m.handle_input(InputEvent::RequestCell(0));
        loaded(&mut m);

        m.handle_input(InputEvent::TogglePause);
        assert_eq!(m.display_state().lifecycle, Lifecycle::Paused);
        m.handle_input(InputEvent::TogglePause);
        assert_eq!(m.display_state().lifecycle, Lifecycle::Playing);

        m.handle_input(InputEvent::Stop);
        let ds = m.display_state();
        assert_eq!(ds.lifecycle, Lifecycle::Stopped);
        assert!(ds.cells.iter().all(|c| c.led == LedState::Off));
        assert_eq!(ds.pulse, [false; 3]);
    }

    #[test]
    fn immediate_stop_toggle_is_reflected() {
        let mut m = middle();
        assert!(!m.display_state().immediate_stop);
        m.handle_input(InputEvent::ToggleImmediateStop);
        assert!(m.display_state().immediate_stop);
    }

    #[test]
    fn out_of_range_cell_is_ignored() {
        let mut m = middle();
        m.handle_input(InputEvent::RequestCell(200));
        assert_eq!(*m.scheduler.init_state(), InitState::Uninitialized);
    }
}
