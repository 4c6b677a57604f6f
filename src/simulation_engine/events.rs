// events.rs
//
// Append-only trace of everything that happened during a run. Vehicle tasks
// push into the shared vector under its own mutex; the coordinator hands the
// finished trace back so callers (and the integration tests) can replay it.
// Recording an event never blocks a quadrant lock.

use std::sync::{Arc, Mutex};

use crate::simulation_engine::quadrants::Quadrant;
use crate::simulation_engine::routes::Direction;

/// One step of a vehicle's trip through the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficEvent {
    /// Vehicle appeared and picked its movement.
    Arrived {
        id: u64,
        origin: Direction,
        destination: Direction,
    },
    /// Vehicle obtained the lock for `quadrant` and now occupies it.
    Acquired { id: u64, quadrant: Quadrant },
    /// Vehicle vacated `quadrant` and is about to drop its lock.
    Released { id: u64, quadrant: Quadrant },
    /// Vehicle finished its crossing and released everything.
    Crossed { id: u64 },
}

/// Shared event sink, one per simulation run.
pub type EventLog = Arc<Mutex<Vec<TrafficEvent>>>;

pub fn new_event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn record(events: &EventLog, event: TrafficEvent) {
    events.lock().unwrap().push(event);
}
