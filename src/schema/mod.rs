//! Schema module - Configuration types for lattice Boltzmann simulations.

mod config;

pub use config::*;
