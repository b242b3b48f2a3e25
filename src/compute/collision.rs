//! BGK collision operator - relaxes populations toward local equilibrium.
//!
//! f_i <- f_i - (f_i - feq_i) / tau, applied uniformly to every cell.
//! Solid cells are collided too; streaming's bounce-back overwrites them.

use rayon::prelude::*;

use super::grid::{MacroscopicField, PopulationField};
use super::lattice::equilibrium;

/// Relax every population toward equilibrium, writing the next generation.
///
/// Reads the current generation and the macroscopic field from the last
/// recovery; one parallel pass per direction plane.
pub fn collide_into(
    current: &PopulationField,
    field: &MacroscopicField,
    tau: f32,
    next: &mut PopulationField,
) {
    let inv_tau = 1.0 / tau;

    for i in 0..9 {
        let src = current.plane(i);
        next.plane_mut(i)
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, out)| {
                let feq = equilibrium(i, field.rho[idx], field.ux[idx], field.uy[idx]);
                let f = src[idx];
                *out = f - (f - feq) * inv_tau;
            });
    }
}
