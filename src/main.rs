//! Lattice Flow CLI - Run simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use lattice_flow::{LbmSolver, SimulationConfig, SimulationStats};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a D2Q9 lattice Boltzmann channel-flow simulation.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  steps        Number of simulation steps (default: 1000)");
        eprintln!();
        eprintln!("Example configuration is printed with --example.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1000);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Lattice Boltzmann Channel Flow");
    println!("==============================");
    println!("Grid: {}x{}", config.nx(), config.ny());
    println!(
        "Re = {}, u_in = {}, nu = {:.3e}, tau = {:.4}",
        config.reynolds,
        config.inlet_velocity,
        config.viscosity(),
        config.tau()
    );
    println!("Steps: {}", steps);
    println!();

    let mut solver = LbmSolver::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let initial_stats = SimulationStats::from_solver(&solver);
    println!("Initial state:");
    println!("  Total mass: {:.6}", initial_stats.total_mass);
    println!("  Solid cells: {}", initial_stats.solid_cells);
    println!();

    println!("Running simulation...");
    let start = Instant::now();

    let report_every = (steps / 10).max(1);
    for i in 0..steps {
        if let Err(e) = solver.step() {
            eprintln!("Simulation failed at step {}: {}", i, e);
            eprintln!("Re-initialize with stabler parameters (lower u_in or Re).");
            std::process::exit(2);
        }

        if (i + 1) % report_every == 0 {
            let stats = SimulationStats::from_solver(&solver);
            let elapsed = start.elapsed().as_secs_f32();
            let steps_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Step {}/{}: max |u|={:.4}, rho=[{:.4}, {:.4}], {:.1} steps/s",
                i + 1,
                steps,
                stats.max_speed,
                stats.min_rho,
                stats.max_rho,
                steps_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    let final_stats = SimulationStats::from_solver(&solver);

    println!();
    println!("Final state (t = {:.3}):", solver.time());
    println!("  Total mass: {:.6}", final_stats.total_mass);
    println!("  Max speed: {:.6}", final_stats.max_speed);
    println!(
        "  Density range: [{:.6}, {:.6}]",
        final_stats.min_rho, final_stats.max_rho
    );
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = SimulationConfig::default();
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
