// intersection.rs
//
// The shared picture of who occupies which quadrant, plus the textual
// rendering of it. Every mutation and every render happens under the one
// display lock, so snapshots are never torn and transcript lines never
// interleave mid-grid. The lock is held only for the update itself, never
// across a vehicle's full hold on a quadrant.

use std::sync::{Arc, Mutex};

use crate::simulation_engine::quadrants::Quadrant;

/// Occupancy of the four quadrants, indexed by rank.
///
/// Invariant: `cells[q.rank()]` is `Some(id)` only while vehicle `id`
/// currently holds quadrant `q`'s lock.
#[derive(Debug, Default)]
pub struct IntersectionState {
    cells: [Option<u64>; 4],
}

/// The display/state lock shared by every vehicle task. This is a std
/// mutex: it is never held across an await point.
pub type SharedIntersection = Arc<Mutex<IntersectionState>>;

impl IntersectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedIntersection {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Records `vehicle_id` as the occupant of `quadrant`. The caller must
    /// hold the quadrant's lock, so the cell is necessarily empty.
    pub fn occupy(&mut self, quadrant: Quadrant, vehicle_id: u64) {
        debug_assert!(self.cells[quadrant.rank()].is_none());
        self.cells[quadrant.rank()] = Some(vehicle_id);
    }

    /// Clears the cell for `quadrant` ahead of the lock release.
    pub fn vacate(&mut self, quadrant: Quadrant) {
        self.cells[quadrant.rank()] = None;
    }

    pub fn occupant(&self, quadrant: Quadrant) -> Option<u64> {
        self.cells[quadrant.rank()]
    }

    /// True when no vehicle occupies any quadrant.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Renders the intersection as the ASCII grid printed after every state
    /// change. Vehicle IDs are centered in three columns per cell.
    pub fn render(&self) -> String {
        let cell = |quadrant: Quadrant| {
            let occupant = match self.occupant(quadrant) {
                Some(id) => id.to_string(),
                None => String::from(" "),
            };
            format!("{occupant:^3}")
        };
        let no = cell(Quadrant::NO);
        let ne = cell(Quadrant::NE);
        let so = cell(Quadrant::SO);
        let se = cell(Quadrant::SE);

        let mut grid = String::new();
        grid.push_str("--- INTERSECTION STATE ---\n");
        grid.push_str("       Norte↑\n");
        grid.push_str(" ╔═══════╦═══════╗\n");
        grid.push_str(&format!(" ║  {no}  ║  {ne}  ║\n"));
        grid.push_str("O║═══════╬═══════║E\n");
        grid.push_str(&format!(" ║  {so}  ║  {se}  ║\n"));
        grid.push_str(" ╚═══════╩═══════╝\n");
        grid.push_str("       Sur↓\n");
        grid.push_str(&"-".repeat(35));
        grid
    }
}
