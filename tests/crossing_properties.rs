// tests/crossing_properties.rs
//
// End-to-end properties of the crossing protocol, checked by replaying the
// event trace a run leaves behind: per-quadrant mutual exclusion, ascending
// acquisition, reverse-order release, and termination.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::{timeout, Duration};

use intersection_sim::config::SimulationConfig;
use intersection_sim::simulation_engine::crossing::cross;
use intersection_sim::simulation_engine::events::{new_event_log, TrafficEvent};
use intersection_sim::simulation_engine::intersection::IntersectionState;
use intersection_sim::simulation_engine::quadrants::{Quadrant, QuadrantLocks};
use intersection_sim::simulation_engine::routes::Direction;
use intersection_sim::simulation_engine::simulation::run_simulation;
use intersection_sim::simulation_engine::vehicles::{Vehicle, VehicleState};

/// Config with millisecond-scale pacing so tests finish quickly.
fn fast_config(num_vehicles: usize, seed: u64) -> SimulationConfig {
    SimulationConfig {
        num_vehicles,
        seed,
        arrival_stagger_ms: (1, 3),
        hold_ms: (1, 4),
        release_pause_ms: (1, 2),
    }
}

/// For every quadrant, events must strictly alternate
/// Acquired(id) / Released(id) with matching vehicle IDs: that is mutual
/// exclusion, since Released is recorded before the lock is dropped.
fn assert_mutual_exclusion(trace: &[TrafficEvent]) {
    let mut occupant: HashMap<Quadrant, u64> = HashMap::new();
    for event in trace {
        match *event {
            TrafficEvent::Acquired { id, quadrant } => {
                assert!(
                    occupant.insert(quadrant, id).is_none(),
                    "two vehicles inside quadrant {quadrant} at once"
                );
            }
            TrafficEvent::Released { id, quadrant } => {
                assert_eq!(
                    occupant.remove(&quadrant),
                    Some(id),
                    "quadrant {quadrant} released by a vehicle that did not hold it"
                );
            }
            _ => {}
        }
    }
    assert!(occupant.is_empty(), "quadrants still occupied at the end");
}

/// Every vehicle must acquire in strictly ascending rank order and release
/// in the exact reverse order.
fn assert_lock_order(trace: &[TrafficEvent]) {
    let mut acquired: HashMap<u64, Vec<Quadrant>> = HashMap::new();
    let mut released: HashMap<u64, Vec<Quadrant>> = HashMap::new();
    for event in trace {
        match *event {
            TrafficEvent::Acquired { id, quadrant } => acquired.entry(id).or_default().push(quadrant),
            TrafficEvent::Released { id, quadrant } => released.entry(id).or_default().push(quadrant),
            _ => {}
        }
    }
    for (id, quadrants) in &acquired {
        assert!(
            quadrants.windows(2).all(|w| w[0] < w[1]),
            "vehicle {id} acquired out of rank order: {quadrants:?}"
        );
        let mut reversed = quadrants.clone();
        reversed.reverse();
        assert_eq!(
            released.get(id),
            Some(&reversed),
            "vehicle {id} did not release in reverse order"
        );
    }
}

fn crossed_ids(trace: &[TrafficEvent]) -> Vec<u64> {
    trace
        .iter()
        .filter_map(|event| match event {
            TrafficEvent::Crossed { id } => Some(*id),
            _ => None,
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn full_simulation_upholds_all_invariants() {
    let config = fast_config(12, 7);
    let trace = timeout(Duration::from_secs(30), run_simulation(config))
        .await
        .expect("simulation deadlocked or stalled")
        .unwrap();

    assert_mutual_exclusion(&trace);
    assert_lock_order(&trace);

    let mut crossed = crossed_ids(&trace);
    crossed.sort();
    assert_eq!(crossed, (0..12).collect::<Vec<u64>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_routes_do_not_deadlock() {
    // Norte -> Este needs {NO, SO, SE}; Sur -> Oeste needs {SE, NE, NO}.
    // Both want NO and SE, so an unsorted acquisition could cross-block.
    let locks = Arc::new(QuadrantLocks::new());
    let intersection = IntersectionState::shared();
    let events = new_event_log();
    let config = fast_config(2, 11);

    let mut handles = Vec::new();
    for (id, origin, destination) in [
        (0, Direction::Norte, Direction::Este),
        (1, Direction::Sur, Direction::Oeste),
    ] {
        let locks = Arc::clone(&locks);
        let intersection = Arc::clone(&intersection);
        let events = Arc::clone(&events);
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            let mut rng = SmallRng::seed_from_u64(id);
            let mut vehicle = Vehicle::with_route(id, origin, destination);
            vehicle.choose_route().unwrap();
            cross(&mut vehicle, &locks, &intersection, &events, &config, &mut rng)
                .await
                .unwrap();
            vehicle.state
        }));
    }

    for handle in handles {
        let state = timeout(Duration::from_secs(30), handle)
            .await
            .expect("crossing deadlocked")
            .unwrap();
        assert_eq!(state, VehicleState::Done);
    }

    let trace = events.lock().unwrap().clone();
    assert_mutual_exclusion(&trace);
    assert_lock_order(&trace);

    // Both vehicles passed through the contested quadrants.
    for id in [0, 1] {
        for quadrant in [Quadrant::NO, Quadrant::SE] {
            assert!(trace.contains(&TrafficEvent::Acquired { id, quadrant }));
        }
    }
    assert!(intersection.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn adversarial_left_turns_terminate() {
    // Four simultaneous left turns: each vehicle wants three of the four
    // quadrants, maximizing contention.
    let locks = Arc::new(QuadrantLocks::new());
    let intersection = IntersectionState::shared();
    let events = new_event_log();
    let config = fast_config(4, 3);

    let movements = [
        (0, Direction::Norte, Direction::Este),
        (1, Direction::Sur, Direction::Oeste),
        (2, Direction::Este, Direction::Sur),
        (3, Direction::Oeste, Direction::Norte),
    ];

    let mut handles = Vec::new();
    for (id, origin, destination) in movements {
        let locks = Arc::clone(&locks);
        let intersection = Arc::clone(&intersection);
        let events = Arc::clone(&events);
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            let mut rng = SmallRng::seed_from_u64(id);
            let mut vehicle = Vehicle::with_route(id, origin, destination);
            vehicle.choose_route().unwrap();
            cross(&mut vehicle, &locks, &intersection, &events, &config, &mut rng)
                .await
                .unwrap();
        }));
    }

    for handle in handles {
        timeout(Duration::from_secs(30), handle)
            .await
            .expect("crossing deadlocked")
            .unwrap();
    }

    let trace = events.lock().unwrap().clone();
    assert_mutual_exclusion(&trace);
    assert_lock_order(&trace);
    assert_eq!(crossed_ids(&trace).len(), 4);
    assert!(intersection.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn single_vehicle_runs_to_done() {
    let trace = timeout(Duration::from_secs(30), run_simulation(fast_config(1, 1)))
        .await
        .expect("simulation stalled")
        .unwrap();

    assert_eq!(crossed_ids(&trace), vec![0]);
    assert_mutual_exclusion(&trace);
    assert_lock_order(&trace);
}
