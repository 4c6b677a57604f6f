pub mod config;
pub mod errors;
pub mod simulation_engine;
