// simulation_engine/mod.rs
pub mod crossing;
pub mod events;
pub mod intersection;
pub mod quadrants;
pub mod routes;
pub mod simulation;
pub mod vehicles;
