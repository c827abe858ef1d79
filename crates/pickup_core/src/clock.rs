use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

/// Simulated time in minutes since the start of the run.
pub type SimTime = f64;

/// What happens when an event fires. Departure and balk carry the affected customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival,
    Departure(Entity),
    Balk(Entity),
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Arrival => "arrival",
            EventKind::Departure(_) => "departure",
            EventKind::Balk(_) => "balk",
        }
    }

    pub fn customer(&self) -> Option<Entity> {
        match self {
            EventKind::Arrival => None,
            EventKind::Departure(entity) | EventKind::Balk(entity) => Some(*entity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub timestamp: SimTime,
    /// Insertion sequence number; equal timestamps pop in insertion order.
    pub seq: u64,
    pub kind: EventKind,
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, seq).
        other
            .timestamp
            .total_cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being dispatched to the systems.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: SimTime,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `kind` at absolute time `timestamp` (minutes).
    pub fn schedule_at(&mut self, timestamp: SimTime, kind: EventKind) {
        debug_assert!(!timestamp.is_nan(), "event timestamp must be a number");
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp,
            seq,
            kind,
        });
    }

    /// Schedule `kind` at `now + delay` (minutes).
    pub fn schedule_in(&mut self, delay: SimTime, kind: EventKind) {
        self.schedule_at(self.now + delay, kind);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<SimTime> {
        self.events.peek().map(|event| event.timestamp)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
