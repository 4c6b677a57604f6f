// crossing.rs
//
// The resource acquisition protocol. Every vehicle acquires its quadrant
// locks strictly in ascending rank order and releases them in the reverse
// order. Because all vehicles approach the locks in the same global order,
// no circular wait can form: a vehicle holding rank k only ever waits on
// ranks above k.
//
// Acquisition blocks without timeout; a held-up vehicle simply waits for
// the occupant ahead of it.

use rand::rngs::SmallRng;
use rand::Rng;
use tokio::time::{sleep, Duration};

use crate::config::SimulationConfig;
use crate::errors::SimResult;
use crate::simulation_engine::events::{record, EventLog, TrafficEvent};
use crate::simulation_engine::intersection::SharedIntersection;
use crate::simulation_engine::quadrants::QuadrantLocks;
use crate::simulation_engine::vehicles::{Vehicle, VehicleState};

fn pause_in(range: (u64, u64), rng: &mut SmallRng) -> Duration {
    Duration::from_millis(rng.random_range(range.0..=range.1))
}

/// Drives `vehicle` through the intersection: acquire every quadrant on its
/// sorted path in ascending rank order, hold, then release in descending
/// order. The vehicle must already have chosen its route.
///
/// State updates and transcript output happen under the display lock; the
/// lock is released again before every simulated delay.
pub async fn cross(
    vehicle: &mut Vehicle,
    locks: &QuadrantLocks,
    intersection: &SharedIntersection,
    events: &EventLog,
    config: &SimulationConfig,
    rng: &mut SmallRng,
) -> SimResult<()> {
    debug_assert_eq!(vehicle.state, VehicleState::RouteChosen);

    {
        let _state = intersection.lock().unwrap();
        println!(
            "Vehicle {}: needs quadrants in lock order {:?}.",
            vehicle.id,
            vehicle
                .path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        );
    }

    // Acquisition phase: ascending rank order, blocking without timeout.
    let mut held = Vec::with_capacity(vehicle.path.len());
    for (k, &quadrant) in vehicle.path.iter().enumerate() {
        vehicle.state = VehicleState::Acquiring(k);
        let guard = locks.acquire(quadrant).await;
        {
            let mut state = intersection.lock().unwrap();
            state.occupy(quadrant, vehicle.id);
            record(events, TrafficEvent::Acquired { id: vehicle.id, quadrant });
            println!("Vehicle {}: acquired quadrant {}.", vehicle.id, quadrant);
            println!("{}", state.render());
        }
        held.push((quadrant, guard));

        // Simulated crossing time for this segment.
        sleep(pause_in(config.hold_ms, rng)).await;
    }

    vehicle.state = VehicleState::AllAcquired;
    {
        let _state = intersection.lock().unwrap();
        println!(
            "Vehicle {}: crossing complete, releasing quadrants.",
            vehicle.id
        );
    }

    // Release phase: reverse of acquisition. Only the acquisition order
    // matters for deadlock freedom; releasing never introduces a new wait.
    while let Some((quadrant, guard)) = held.pop() {
        vehicle.state = VehicleState::Releasing(held.len() + 1);
        {
            let mut state = intersection.lock().unwrap();
            state.vacate(quadrant);
            record(events, TrafficEvent::Released { id: vehicle.id, quadrant });
            println!("Vehicle {}: released quadrant {}.", vehicle.id, quadrant);
            println!("{}", state.render());
        }
        drop(guard);

        sleep(pause_in(config.release_pause_ms, rng)).await;
    }

    vehicle.state = VehicleState::Done;
    record(events, TrafficEvent::Crossed { id: vehicle.id });
    Ok(())
}
