// routes.rs
//
// The static route table. A route is an (origin, destination) pair mapped to
// the set of quadrants a vehicle must occupy to complete that movement;
// straight, left-turn and right-turn semantics are baked into the table.
// The sets are written here in path order, not rank order; the crossing
// protocol sorts them before acquiring anything.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{SimResult, SimulationError};
use crate::simulation_engine::quadrants::Quadrant;

/// One of the four approaches to the intersection.
///
/// The labels come from the original road signage, so `Display` and the
/// route table use them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Norte,
    Sur,
    Este,
    Oeste,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Norte,
        Direction::Sur,
        Direction::Este,
        Direction::Oeste,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Norte => "Norte",
            Direction::Sur => "Sur",
            Direction::Este => "Este",
            Direction::Oeste => "Oeste",
        };
        write!(f, "{label}")
    }
}

/// Looks up the quadrants required to travel from `origin` to `destination`.
///
/// The lookup is pure; the returned slice is unsorted. Fails with
/// [`SimulationError::InvalidRoute`] when the pair is degenerate
/// (origin equals destination) — no self-loop routes exist.
pub fn route_quadrants(origin: Direction, destination: Direction) -> SimResult<&'static [Quadrant]> {
    use Direction::*;
    use Quadrant::*;

    let quadrants: &'static [Quadrant] = match (origin, destination) {
        (Norte, Sur) => &[NO, SO],
        (Norte, Este) => &[NO, SO, SE],
        (Norte, Oeste) => &[NO],
        (Sur, Norte) => &[SE, NE],
        (Sur, Oeste) => &[SE, NE, NO],
        (Sur, Este) => &[SE],
        (Este, Oeste) => &[NE, NO],
        (Este, Sur) => &[NE, NO, SO],
        (Este, Norte) => &[NE],
        (Oeste, Este) => &[SO, SE],
        (Oeste, Norte) => &[SO, SE, NE],
        (Oeste, Sur) => &[SO],
        _ => {
            return Err(SimulationError::InvalidRoute {
                origin,
                destination,
            })
        }
    };
    Ok(quadrants)
}
