//! One-shot timers driven by the frame clock
//!
//! Timers are advanced explicitly from the loop, so a fired timer runs on
//! the same thread as the rest of the scene and tests can step time by hand.

use std::time::Duration;

/// Identifier returned by [`Timers::schedule`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

/// Queue of events waiting on a deadline
#[derive(Debug)]
pub struct Timers<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Fire `event` once `delay` has passed
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            event,
        });
        id
    }

    /// Move the clock forward and return every event that came due,
    /// earliest first (ties in scheduling order)
    pub fn advance(&mut self, dt: Duration) -> Vec<E> {
        self.now += dt;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| p.event).collect()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = Timers::new();
        timers.schedule(Duration::from_millis(500), "placeholder");

        assert!(timers.advance(Duration::from_millis(499)).is_empty());
        assert_eq!(timers.advance(Duration::from_millis(1)), vec!["placeholder"]);
        assert_eq!(timers.pending(), 0);
        assert!(timers.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut timers = Timers::new();
        timers.schedule(Duration::from_millis(300), 3);
        timers.schedule(Duration::from_millis(100), 1);
        timers.schedule(Duration::from_millis(100), 2);

        assert_eq!(timers.advance(Duration::from_secs(1)), vec![1, 2, 3]);
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut timers = Timers::new();
        timers.advance(Duration::from_secs(2));
        timers.schedule(Duration::from_millis(500), ());
        assert!(timers.advance(Duration::from_millis(400)).is_empty());
        assert_eq!(timers.advance(Duration::from_millis(100)).len(), 1);
        assert_eq!(timers.now(), Duration::from_millis(2500));
    }
}
