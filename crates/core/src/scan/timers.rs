//! Bookkeeping for the session's delayed transitions.

use std::collections::HashMap;

use serde::Serialize;

/// Identifier of a scheduled timer. Ids are never reused within a machine,
/// so a firing for an id that is no longer live is always stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// End of the "badge scanned" acknowledgement; advance to the ticket scan.
    Acknowledge,
    /// End of the success screen; full reset for the next attendee.
    SuccessReset,
}

/// The set of live, cancellable timers.
#[derive(Debug, Default)]
pub struct TimerSet {
    next_id: u64,
    live: HashMap<TimerId, TimerKind>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new live timer and return its id.
    pub fn schedule(&mut self, kind: TimerKind) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.live.insert(id, kind);
        id
    }

    /// Consume a firing. Returns `None` when the timer was cancelled.
    pub fn fire(&mut self, id: TimerId) -> Option<TimerKind> {
        self.live.remove(&id)
    }

    /// Cancel every live timer, returning their ids in scheduling order.
    pub fn drain(&mut self) -> Vec<TimerId> {
        let mut ids: Vec<TimerId> = self.live.drain().map(|(id, _)| id).collect();
        ids.sort();
        ids
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fired_and_drained_ids_are_gone() {
        let mut timers = TimerSet::new();
        let a = timers.schedule(TimerKind::Acknowledge);
        let b = timers.schedule(TimerKind::SuccessReset);
        assert_ne!(a, b);

        assert_eq!(timers.fire(a), Some(TimerKind::Acknowledge));
        assert_eq!(timers.fire(a), None);

        assert_eq!(timers.drain(), vec![b]);
        assert!(timers.is_empty());
        assert_eq!(timers.fire(b), None);
    }

    #[test]
    fn ids_are_not_reused_after_drain() {
        let mut timers = TimerSet::new();
        let first = timers.schedule(TimerKind::Acknowledge);
        timers.drain();
        let second = timers.schedule(TimerKind::Acknowledge);
        assert!(second > first);
        assert!(!timers.is_live(first));
    }
}
