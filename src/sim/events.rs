//! Session event publishing
//!
//! Observers (HUD, audio, logging, router) register a callback and receive
//! every event synchronously, in registration order, on the simulation thread.

use std::fmt;

use super::ledger::SessionLedger;
use super::orbs::OrbId;
use super::session::SessionPhase;
use crate::app::Scene;

/// Something observable that happened during a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged { from: SessionPhase, to: SessionPhase },
    LaneChanged { lane: usize, points: u64 },
    OrbSpawned { id: OrbId, lane: usize },
    OrbCollected { id: Option<OrbId>, combo: u32, points: u64 },
    OrbMissed { id: OrbId, lost_combo: u32 },
    /// Calibration prompt; empty when calibration is over
    CalibrationText(&'static str),
    HudVisible(bool),
    /// Final ledger as committed to the context
    SessionCommitted(SessionLedger),
    Navigate(Scene),
}

/// Registration handle returned by [`EventChannel::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Multicast channel with ordered, synchronous delivery
pub struct EventChannel<E> {
    listeners: Vec<(ListenerId, Listener<E>)>,
    next_id: u64,
}

impl<E> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_delivery_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::<u32>::new();

        let first = log.clone();
        channel.subscribe(move |e| first.borrow_mut().push(("a", *e)));
        let second = log.clone();
        channel.subscribe(move |e| second.borrow_mut().push(("b", *e)));

        channel.emit(&1);
        channel.emit(&2);
        assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut channel = EventChannel::<()>::new();
        let c = count.clone();
        let id = channel.subscribe(move |_| *c.borrow_mut() += 1);

        channel.emit(&());
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        channel.emit(&());
        assert_eq!(*count.borrow(), 1);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_no_listeners_is_fine() {
        let mut channel = EventChannel::<u8>::default();
        channel.emit(&3);
        assert_eq!(channel.len(), 0);
    }
}
