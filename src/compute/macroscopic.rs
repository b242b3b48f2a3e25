//! Macroscopic recovery - derives density and velocity from populations.
//!
//! rho = sum f_i, rho u = sum f_i e_i. The recovery pass overwrites the
//! macroscopic field in place; a separate divergence check surfaces rho <= 0
//! or non-finite velocities as an observable failure instead of letting NaNs
//! propagate silently.

use rayon::prelude::*;

use super::grid::{MacroscopicField, PopulationField};
use super::lattice::C;

/// Runtime solver failures.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Numerical divergence at cell ({x}, {y}): rho = {rho}, |u| = {speed}")]
    Diverged { x: usize, y: usize, rho: f32, speed: f32 },
}

/// Recover density and velocity for every cell into `out`.
///
/// Reads the current population generation only. Parallelized row-wise; each
/// row's output is owned exclusively by one task.
pub fn recover_into(populations: &PopulationField, out: &mut MacroscopicField) {
    let nx = populations.nx();

    let f0 = populations.plane(0);
    let f1 = populations.plane(1);
    let f2 = populations.plane(2);
    let f3 = populations.plane(3);
    let f4 = populations.plane(4);
    let f5 = populations.plane(5);
    let f6 = populations.plane(6);
    let f7 = populations.plane(7);
    let f8 = populations.plane(8);

    out.ux
        .par_chunks_mut(nx)
        .zip(out.uy.par_chunks_mut(nx))
        .zip(out.rho.par_chunks_mut(nx))
        .enumerate()
        .for_each(|(y, ((row_ux, row_uy), row_rho))| {
            let base = y * nx;
            for x in 0..nx {
                let idx = base + x;
                let rho = f0[idx]
                    + f1[idx]
                    + f2[idx]
                    + f3[idx]
                    + f4[idx]
                    + f5[idx]
                    + f6[idx]
                    + f7[idx]
                    + f8[idx];
                let mx = f1[idx] + f5[idx] + f8[idx] - f3[idx] - f6[idx] - f7[idx];
                let my = f2[idx] + f5[idx] + f6[idx] - f4[idx] - f7[idx] - f8[idx];
                row_rho[x] = rho;
                row_ux[x] = C * mx / rho;
                row_uy[x] = C * my / rho;
            }
        });
}

/// Recover one cell's macroscopic state directly from populations.
///
/// Used by the boundary operators, which only need a single column.
#[inline]
pub fn recover_cell(populations: &PopulationField, x: usize, y: usize) -> (f32, f32, f32) {
    let idx = populations.idx(x, y);
    let f: [f32; 9] = std::array::from_fn(|i| populations.plane(i)[idx]);
    let rho = f.iter().sum::<f32>();
    let ux = C * (f[1] + f[5] + f[8] - f[3] - f[6] - f[7]) / rho;
    let uy = C * (f[2] + f[5] + f[6] - f[4] - f[7] - f[8]) / rho;
    (rho, ux, uy)
}

/// Scan the recovered field for numerical divergence.
///
/// Solid cells are excluded: their populations are bounce-back scratch
/// values with no physical meaning.
pub fn check_divergence(field: &MacroscopicField, solid: &[bool]) -> Result<(), SolverError> {
    let nx = field.nx();
    let bad = field
        .rho
        .par_iter()
        .zip(field.ux.par_iter())
        .zip(field.uy.par_iter())
        .enumerate()
        .find_map_any(|(idx, ((&rho, &ux), &uy))| {
            if solid[idx] {
                return None;
            }
            if rho <= 0.0 || !ux.is_finite() || !uy.is_finite() {
                Some(idx)
            } else {
                None
            }
        });

    match bad {
        Some(idx) => {
            let (x, y) = (idx % nx, idx / nx);
            Err(SolverError::Diverged {
                x,
                y,
                rho: field.rho[idx],
                speed: field.speed(idx),
            })
        }
        None => Ok(()),
    }
}
