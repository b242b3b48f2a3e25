//! Compute module - Numerical core of the lattice Boltzmann solver.

mod boundary;
mod collision;
mod grid;
mod lattice;
mod macroscopic;
mod obstacle;
mod solver;
mod streaming;

pub use boundary::*;
pub use collision::*;
pub use grid::*;
pub use lattice::*;
pub use macroscopic::*;
pub use obstacle::*;
pub use solver::*;
pub use streaming::*;
