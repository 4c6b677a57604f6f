// quadrants.rs
//
// The four quadrants of the intersection and their locks. Every quadrant
// carries a fixed rank (0..3); the rank order is the single global order
// all vehicles use when acquiring locks, which is what rules out circular
// waits.

use std::fmt;
use tokio::sync::{Mutex, MutexGuard};

/// One of the four mutually exclusive zones of the intersection.
///
/// The discriminant is the quadrant's global rank. `Ord` follows the rank,
/// so sorting a route's quadrants yields the canonical acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quadrant {
    /// Northeast, rank 0.
    NE = 0,
    /// Northwest, rank 1.
    NO = 1,
    /// Southwest, rank 2.
    SO = 2,
    /// Southeast, rank 3.
    SE = 3,
}

impl Quadrant {
    /// All quadrants in ascending rank order.
    pub const ALL: [Quadrant; 4] = [Quadrant::NE, Quadrant::NO, Quadrant::SO, Quadrant::SE];

    /// The quadrant's position in the global lock order.
    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn from_rank(rank: usize) -> Option<Quadrant> {
        Quadrant::ALL.get(rank).copied()
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quadrant::NE => "NE",
            Quadrant::NO => "NO",
            Quadrant::SO => "SO",
            Quadrant::SE => "SE",
        };
        write!(f, "{label}")
    }
}

/// One async mutex per quadrant, indexed by rank.
///
/// Guards are held across the simulated crossing delays, so these are
/// `tokio::sync::Mutex` rather than std mutexes.
#[derive(Debug, Default)]
pub struct QuadrantLocks {
    locks: [Mutex<()>; 4],
}

impl QuadrantLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks (asynchronously, without timeout) until `quadrant` is free.
    pub async fn acquire(&self, quadrant: Quadrant) -> MutexGuard<'_, ()> {
        self.locks[quadrant.rank()].lock().await
    }
}
