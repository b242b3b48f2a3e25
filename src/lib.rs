//! Lattice Flow - D2Q9 lattice Boltzmann channel-flow solver.
//!
//! This crate computes a time-evolving 2D incompressible viscous flow field
//! around an immersed circular obstacle using the lattice Boltzmann method
//! with BGK relaxation: prescribed-velocity inlet on the west edge,
//! zero-gradient outlet on the east edge, bounce-back channel walls, and
//! full bounce-back at the obstacle surface.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration types and validation
//! - `compute`: Numerical core (grid storage, collision, streaming,
//!   boundary operators, step scheduler)
//!
//! # Example
//!
//! ```rust,no_run
//! use lattice_flow::{LbmSolver, SimulationConfig, SimulationStats};
//!
//! // Reference case: 200x200 grid, Re = 200, u_in = 0.1
//! let config = SimulationConfig::default();
//!
//! let mut solver = LbmSolver::new(config)?;
//! solver.run(1000)?;
//!
//! // The macroscopic field is the solver's only external output; a
//! // renderer would map speed(idx) onto a color ramp.
//! let stats = SimulationStats::from_solver(&solver);
//! println!("max |u| after 1000 steps: {}", stats.max_speed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{LbmSolver, MacroscopicField, SimulationStats, SolverError};
pub use schema::{ConfigError, EdgePolicy, ObstacleConfig, SimulationConfig};
