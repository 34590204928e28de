//! Sweep events and the queue that orders them
//!
//! Events come out in ascending sweep coordinate. Events sharing a coordinate
//! come out in the order they were enqueued, which keeps runs deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use super::arc::ArcId;
use crate::geometry::{Circle, Point};

/// Identity of an enqueued event, unique within one queue
pub(crate) type EventId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Event {
    /// A new site reaches the sweep line
    Site { site: usize, point: Point },
    /// The middle arc of a converging triple shrinks to zero width
    ///
    /// `generation` is the arc's generation when the event was scheduled; a
    /// mismatch on dequeue marks the event as stale.
    Circle {
        circle: Circle,
        arc: ArcId,
        generation: u32,
    },
}

#[derive(Debug)]
struct Queued {
    key: f64,
    id: EventId,
    event: Event,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    // BinaryHeap is a max-heap: smaller key and earlier id must compare greater
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Min-priority queue of sweep events keyed by sweep coordinate
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    heap: BinaryHeap<Queued>,
    pending: HashSet<EventId>,
    next_id: EventId,
}

impl EventQueue {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            pending: HashSet::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Insert `event` at sweep coordinate `key` and return its identity
    pub(crate) fn enqueue(&mut self, event: Event, key: f64) -> EventId {
        let id = self.next_id;
        self.next_id += 1;
        self.heap.push(Queued { key, id, event });
        self.pending.insert(id);
        id
    }

    /// Remove the event with the smallest key
    ///
    /// `None` means the sweep is over.
    pub(crate) fn dequeue(&mut self) -> Option<(f64, Event)> {
        let Queued { key, id, event } = self.heap.pop()?;
        self.pending.remove(&id);
        Some((key, event))
    }

    /// Whether the event with identity `id` is still waiting in the queue
    pub(crate) fn contains(&self, id: EventId) -> bool {
        self.pending.contains(&id)
    }

    /// Total number of events ever enqueued
    pub(crate) fn enqueued(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
