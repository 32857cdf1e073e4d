// Subscriber lists for scheduler events. Each registry hands out tokens
// typed by its event, so a boundary token can't unsubscribe a state
// observer.

use std::fmt;
use std::marker::PhantomData;

use crate::pipeline::pad_state::SamplePadState;
use crate::shared::Lifecycle;

/// Sent once per loop boundary, after the queue has been merged.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryEvent {
    pub current: SamplePadState,
    pub time: f64,
    pub loop_duration: f64,
}

/// Sent whenever the playing or queued pads (or the lifecycle) change.
#[derive(Clone, Debug, PartialEq)]
pub struct StateChange {
    pub current: SamplePadState,
    pub queued: SamplePadState,
    pub lifecycle: Lifecycle,
}

pub struct SubscriptionToken<E> {
    id: u64,
    _event: PhantomData<fn(&E)>,
}

impl<E> Clone for SubscriptionToken<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for SubscriptionToken<E> {}

impl<E> PartialEq for SubscriptionToken<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E> Eq for SubscriptionToken<E> {}

impl<E> fmt::Debug for SubscriptionToken<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionToken({})", self.id)
    }
}

type Observer<E> = Box<dyn FnMut(&E)>;

pub struct ObserverRegistry<E> {
    name: &'static str,
    next_id: u64,
    observers: Vec<(u64, Observer<E>)>, // subscription order
}

impl<E> ObserverRegistry<E> {
    pub fn new(name: &'static str) -> Self {
        Self { name, next_id: 0, observers: Vec::new() }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&E) + 'static) -> SubscriptionToken<E> {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        SubscriptionToken { id, _event: PhantomData }
    }

    /// Unknown tokens are logged and ignored. Returns whether one was removed.
    pub fn unsubscribe(&mut self, token: SubscriptionToken<E>) -> bool {
        match self.observers.iter().position(|(id, _)| *id == token.id) {
            Some(idx) => {
                self.observers.remove(idx);
                true
            }
            None => {
                log::warn!("{}: unsubscribe with unknown token {}", self.name, token.id);
                false
            }
        }
    }

    /// Calls every observer in subscription order.
    pub fn notify(&mut self, event: &E) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }
}
