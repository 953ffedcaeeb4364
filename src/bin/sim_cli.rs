use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use warlock_sim::{format_report, Simulation, SimulationConfig};

#[derive(Parser)]
#[command(name = "sim_cli")]
#[command(about = "Discrete-event DPS simulator for a Burning Crusade warlock")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and print the DPS summary and spell breakdown
    Run {
        /// Path to the configuration JSON file
        config: PathBuf,
        /// Override the number of iterations
        #[arg(short, long)]
        iterations: Option<usize>,
        /// Override the RNG seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Record and print the first iteration's combat log
        #[arg(short, long)]
        log: bool,
    },
    /// Validate a configuration JSON for common errors
    Validate {
        /// Path to the configuration JSON file
        config: PathBuf,
    },
    /// Print a default configuration document
    Template,
}

fn load_config(path: &PathBuf) -> Result<SimulationConfig, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("failed to read {:?}: {}", path, e))?;
    serde_json::from_str(&content).map_err(|e| format!("failed to parse {:?}: {}", path, e))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            iterations,
            seed,
            log,
        } => {
            let mut config = match load_config(&config) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Some(iterations) = iterations {
                config.simulation.iterations = iterations;
            }
            if let Some(seed) = seed {
                config.simulation.rng_seed = seed;
            }
            if log {
                config.simulation.record_combat_log = true;
            }

            let report = match Simulation::new(&config).and_then(|mut sim| sim.run()) {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("simulation failed: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            print!("{}", format_report(&report));
            if config.simulation.record_combat_log {
                println!();
                println!("=== Combat log (iteration 1) ===");
                for line in &report.combat_log {
                    println!("{}", line);
                }
            }
            ExitCode::SUCCESS
        }
        Commands::Validate { config } => match load_config(&config) {
            Ok(config) => match config.validate() {
                Ok(()) => {
                    println!("ok");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            },
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Template => {
            let config = SimulationConfig::default();
            println!("{}", serde_json::to_string_pretty(&config).unwrap());
            ExitCode::SUCCESS
        }
    }
}
