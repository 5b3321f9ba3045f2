//! Time-ordered event queue.
//!
//! Events are popped by `(time, sequence)`. The sequence number is the
//! insertion order, so events scheduled for the same instant are handled
//! first-in first-out on every platform.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::models::{CallId, VehicleId};

/// What happens when an event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A call is received.
    CallArrival(CallId),
    /// Treatment on scene ends; vehicles leave.
    SceneDeparture(CallId),
    /// The transporting vehicle finishes handover at hospital.
    JobComplete { call: CallId, vehicle: VehicleId },
    /// Advance a vehicle one waypoint along travel leg `leg`.
    LocationUpdate { vehicle: VehicleId, leg: u64 },
}

/// A scheduled event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Simulation time (s) at which the event fires.
    pub time_s: f64,
    /// Insertion sequence number, the tie-break key.
    pub sequence: u64,
    /// Event payload.
    pub kind: EventKind,
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time_s
            .total_cmp(&self.time_s)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Pending-event store driving the simulation clock.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
    sequence_counter: u64,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` at `time_s`.
    pub fn push(&mut self, time_s: f64, kind: EventKind) {
        self.heap.push(Event {
            time_s,
            sequence: self.sequence_counter,
            kind,
        });
        self.sequence_counter += 1;
    }

    /// Removes and returns the event with the smallest `(time, sequence)`.
    pub fn pop_earliest(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    /// Time of the next event without removing it.
    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.time_s)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops all pending events and restarts the sequence counter.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.sequence_counter = 0;
    }
}
