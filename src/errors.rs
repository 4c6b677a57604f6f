// src/errors.rs

use crate::simulation_engine::routes::Direction;
use thiserror::Error;

/// Errors produced by the simulation.
///
/// `InvalidRoute` is the only error a running vehicle can hit; it is fatal
/// to that vehicle's task but never touches the quadrant locks. The config
/// and I/O variants only occur while loading a configuration file at startup.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no route defined from {origin} to {destination}")]
    InvalidRoute {
        origin: Direction,
        destination: Direction,
    },

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type used throughout the crate.
pub type SimResult<T> = Result<T, SimulationError>;
