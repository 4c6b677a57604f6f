// vehicles.rs

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

use crate::errors::SimResult;
use crate::simulation_engine::quadrants::Quadrant;
use crate::simulation_engine::routes::{route_quadrants, Direction};

/// Progress of a vehicle through its crossing.
///
/// `Acquiring(k)` and `Releasing(k)` index into the vehicle's sorted
/// quadrant path. No transition skips a required quadrant, and nothing is
/// released before it was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    /// Just spawned; origin and destination chosen.
    Arriving,
    /// Route resolved against the table and sorted into lock order.
    RouteChosen,
    /// Waiting for (or just obtained) the k-th quadrant in sorted order.
    Acquiring(usize),
    /// Every required quadrant is held; the crossing proper.
    AllAcquired,
    /// Releasing from the back of the sorted path; k quadrants still held.
    Releasing(usize),
    /// Crossing finished, everything released.
    Done,
}

/// A simulated vehicle, one concurrent task each.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: u64,
    pub origin: Direction,
    pub destination: Direction,
    /// Required quadrants sorted ascending by rank. Empty until the route
    /// is chosen.
    pub path: Vec<Quadrant>,
    pub state: VehicleState,
}

impl Vehicle {
    /// Spawns a vehicle with a uniformly random origin and a distinct,
    /// uniformly random destination drawn from the vehicle's own RNG.
    pub fn arrive(id: u64, rng: &mut SmallRng) -> Self {
        let origin = *Direction::ALL.choose(rng).unwrap();
        let destination = loop {
            let candidate = *Direction::ALL.choose(rng).unwrap();
            if candidate != origin {
                break candidate;
            }
        };
        Self::with_route(id, origin, destination)
    }

    /// Spawns a vehicle with a fixed movement, for scripted scenarios.
    pub fn with_route(id: u64, origin: Direction, destination: Direction) -> Self {
        Self {
            id,
            origin,
            destination,
            path: Vec::new(),
            state: VehicleState::Arriving,
        }
    }

    /// Resolves the route table and sorts the required quadrants into the
    /// global lock order. On `InvalidRoute` the vehicle stays in `Arriving`
    /// and must not attempt any acquisition.
    pub fn choose_route(&mut self) -> SimResult<()> {
        let mut path = route_quadrants(self.origin, self.destination)?.to_vec();
        path.sort();
        self.path = path;
        self.state = VehicleState::RouteChosen;
        Ok(())
    }
}
