// simulation.rs
//
// The coordinator: spawns one task per vehicle with a staggered start,
// waits for every task to finish, and hands back the event trace. Vehicles
// share the four quadrant locks, the intersection display, and the event
// log; the route table is static and needs no lock.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::{sleep, Duration};

use crate::config::SimulationConfig;
use crate::errors::SimResult;
use crate::simulation_engine::crossing::cross;
use crate::simulation_engine::events::{new_event_log, record, EventLog, TrafficEvent};
use crate::simulation_engine::intersection::{IntersectionState, SharedIntersection};
use crate::simulation_engine::quadrants::QuadrantLocks;
use crate::simulation_engine::vehicles::Vehicle;

/// Mixing constant for deriving per-vehicle seeds from the root seed
/// (64-bit fractional part of the golden ratio, spreads consecutive IDs
/// across the seed space).
const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

fn vehicle_rng(config: &SimulationConfig, id: u64) -> SmallRng {
    SmallRng::seed_from_u64(config.seed ^ id.wrapping_mul(SEED_MIX))
}

/// One vehicle's whole trip, from arrival to done.
///
/// A failed route resolution is fatal to this task only: it is logged and
/// returned without ever touching a quadrant lock.
async fn vehicle_task(
    id: u64,
    locks: Arc<QuadrantLocks>,
    intersection: SharedIntersection,
    events: EventLog,
    config: SimulationConfig,
) -> SimResult<()> {
    let mut rng = vehicle_rng(&config, id);
    let mut vehicle = Vehicle::arrive(id, &mut rng);

    {
        let _state = intersection.lock().unwrap();
        println!(
            "Vehicle {}: arrived from {} heading to {}.",
            vehicle.id, vehicle.origin, vehicle.destination
        );
    }
    record(
        &events,
        TrafficEvent::Arrived {
            id: vehicle.id,
            origin: vehicle.origin,
            destination: vehicle.destination,
        },
    );

    if let Err(e) = vehicle.choose_route() {
        log::error!("vehicle {id} cannot cross: {e}");
        return Err(e);
    }

    cross(&mut vehicle, &locks, &intersection, &events, &config, &mut rng).await
}

/// Runs a full simulation: spawn `config.num_vehicles` vehicle tasks with
/// staggered starts, wait for all of them, and return the recorded trace.
///
/// When the coordinator returns, every vehicle has finished and the
/// intersection is empty again.
pub async fn run_simulation(config: SimulationConfig) -> SimResult<Vec<TrafficEvent>> {
    let locks = Arc::new(QuadrantLocks::new());
    let intersection = IntersectionState::shared();
    let events = new_event_log();

    {
        let state = intersection.lock().unwrap();
        println!("Starting the intersection crossing simulation...");
        println!("{}", state.render());
    }

    let mut spawn_rng = SmallRng::seed_from_u64(config.seed);
    let mut handles = Vec::with_capacity(config.num_vehicles);
    for id in 0..config.num_vehicles as u64 {
        let stagger = spawn_rng.random_range(config.arrival_stagger_ms.0..=config.arrival_stagger_ms.1);
        sleep(Duration::from_millis(stagger)).await;

        handles.push(tokio::spawn(vehicle_task(
            id,
            Arc::clone(&locks),
            Arc::clone(&intersection),
            Arc::clone(&events),
            config.clone(),
        )));
    }

    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("vehicle task failed: {e}"),
            Err(e) => log::error!("vehicle task panicked: {e}"),
        }
    }

    let state = intersection.lock().unwrap();
    debug_assert!(state.is_empty());
    println!("Simulation finished, every vehicle has crossed.");
    drop(state);

    let trace = events.lock().unwrap().clone();
    Ok(trace)
}
