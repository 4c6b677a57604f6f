// simulation_main.rs
use intersection_sim::config::SimulationConfig;
use intersection_sim::simulation_engine::simulation::run_simulation;

#[tokio::main]
async fn main() {
    env_logger::init();

    // Optional single argument: path to a JSON config file.
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    if let Err(e) = run_simulation(config).await {
        eprintln!("simulation failed: {e}");
        std::process::exit(1);
    }
}
