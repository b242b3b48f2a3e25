//! Streaming operator - pull-scheme advection with bounce-back.
//!
//! Each cell's new population in direction i is pulled from the neighbor one
//! step back along that direction: f_i(x) <- f_i(x - e_i), read entirely
//! from the current generation. A pull whose source row lies outside the
//! channel mirrors the direction onto itself (wall bounce-back); a pull
//! whose source column lies outside follows the configured [`EdgePolicy`].
//! Solid cells reverse every direction (full bounce-back, no-slip).

use rayon::prelude::*;

use super::grid::PopulationField;
use super::lattice::{CellClass, E, OPP, classify};
use crate::schema::EdgePolicy;

/// Stream all nine directions from `current` into `next`.
pub fn stream_into(
    current: &PopulationField,
    solid: &[bool],
    policy: EdgePolicy,
    next: &mut PopulationField,
) {
    let nx = current.nx();
    let ny = current.ny();

    for i in 0..9 {
        let src = current.plane(i);
        let opp = current.plane(OPP[i]);
        let (ex, ey) = (E[i][0], E[i][1]);

        next.plane_mut(i)
            .par_chunks_mut(nx)
            .enumerate()
            .for_each(|(y, row)| {
                let base = y * nx;
                for (x, out) in row.iter_mut().enumerate() {
                    let idx = base + x;

                    if classify(x, y, nx, ny, solid) == CellClass::Solid {
                        // Full bounce-back: the opposite direction sampled
                        // one step back from the solid node.
                        let sx = (x as i32 + ex).clamp(0, nx as i32 - 1) as usize;
                        let sy = (y as i32 + ey).clamp(0, ny as i32 - 1) as usize;
                        *out = opp[sy * nx + sx];
                        continue;
                    }

                    let sy = y as i32 - ey;
                    if sy < 0 || sy >= ny as i32 {
                        // Channel wall: mirror the direction onto itself.
                        *out = opp[idx];
                        continue;
                    }

                    let sx = x as i32 - ex;
                    if sx < 0 || sx >= nx as i32 {
                        match policy {
                            EdgePolicy::Clamp => {
                                let cx = sx.clamp(0, nx as i32 - 1) as usize;
                                *out = src[sy as usize * nx + cx];
                            }
                            EdgePolicy::Bounce => *out = opp[idx],
                        }
                        continue;
                    }

                    *out = src[sy as usize * nx + sx as usize];
                }
            });
    }
}
