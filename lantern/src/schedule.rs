//! Tick scheduling.
//!
//! A min-heap keyed by `(due, insertion order)`: earlier deadlines fire
//! first and ties fire in the order they were scheduled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use lantern_core::ActorId;

/// The periodic jobs of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Burn the lantern and check whether the player is hemmed in.
    Lantern,
    /// Let one monster take a step.
    Monster(ActorId),
}

#[derive(Debug)]
struct Entry<E> {
    event: E,
    due: u64,
    seq: u64,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.due.cmp(&other.due).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Events ordered by due time in milliseconds.
#[derive(Debug)]
pub struct Schedule<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    seq: u64,
}

impl<E> Schedule<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Schedule `event` to fire at `due`.
    pub fn push(&mut self, event: E, due: u64) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry { event, due, seq }));
    }

    /// Pop the earliest event if it is due at `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, E)> {
        if self.peek_due()? > now {
            return None;
        }
        self.heap.pop().map(|Reverse(e)| (e.due, e.event))
    }

    /// Due time of the earliest event.
    pub fn peek_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(e)| e.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<E> Default for Schedule<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut s = Schedule::new();
        s.push("c", 30);
        s.push("a", 10);
        s.push("b", 20);
        assert_eq!(s.pop_due(25), Some((10, "a")));
        assert_eq!(s.pop_due(25), Some((20, "b")));
        assert_eq!(s.pop_due(25), None);
        assert_eq!(s.peek_due(), Some(30));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn ties_fire_first_in_first_out() {
        let mut s = Schedule::new();
        s.push(Tick::Monster(ActorId(2)), 5);
        s.push(Tick::Lantern, 5);
        s.push(Tick::Monster(ActorId(1)), 5);
        let order: Vec<Tick> = std::iter::from_fn(|| s.pop_due(5).map(|(_, t)| t)).collect();
        assert_eq!(
            order,
            vec![Tick::Monster(ActorId(2)), Tick::Lantern, Tick::Monster(ActorId(1))]
        );
        assert!(s.is_empty());
    }
}
