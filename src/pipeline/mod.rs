pub mod grid_map;
pub mod merge;
pub mod observers;
pub mod pad_state;
pub mod scheduler;

#[cfg(test)]
pub mod test_fixture;

pub use observers::{BoundaryEvent, StateChange, SubscriptionToken};
pub use pad_state::SamplePadState;
pub use scheduler::{InitState, LoopScheduler};
