//! D2Q9 lattice constants and per-cell kernels.
//!
//! Nine velocity directions on the 2D square lattice:
//! ```text
//!   6   2   5
//!    \  |  /
//!   3 - 0 - 1
//!    /  |  \
//!   7   4   8
//! ```

/// Lattice speed c.
pub const C: f32 = 1.0;

/// Lattice sound speed c_s = c / sqrt(3).
pub const C_S: f32 = 0.577_350_3;

/// Discrete velocities e_i as [ex, ey].
pub const E: [[i32; 2]; 9] = [
    [0, 0],   // 0: rest
    [1, 0],   // 1: east
    [0, 1],   // 2: north
    [-1, 0],  // 3: west
    [0, -1],  // 4: south
    [1, 1],   // 5: northeast
    [-1, 1],  // 6: northwest
    [-1, -1], // 7: southwest
    [1, -1],  // 8: southeast
];

/// Quadrature weights w_i.
pub const W: [f32; 9] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Opposite direction indices, used by bounce-back.
pub const OPP: [usize; 9] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Equilibrium distribution for direction `i` at the given macroscopic state.
///
/// feq_i = rho * w_i * (1 + cu + cu^2/2 - 1.5 |u|^2 / c^2), cu = 3 (e_i . u) / c
#[inline]
pub fn equilibrium(i: usize, rho: f32, ux: f32, uy: f32) -> f32 {
    let ex = E[i][0] as f32;
    let ey = E[i][1] as f32;
    let cu = 3.0 * (ex * ux + ey * uy) / C;
    let usq = (ux * ux + uy * uy) / (C * C);
    rho * W[i] * (1.0 + cu + 0.5 * cu * cu - 1.5 * usq)
}

/// Cell classification consumed by the streaming and boundary operators.
///
/// Replaces the scattered per-pass edge conditionals with a single dispatch.
/// The inlet/outlet columns take precedence over the walls at the corners,
/// matching the column-wise application of the boundary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Interior,
    Inlet,
    Outlet,
    WallTop,
    WallBottom,
    Solid,
}

/// Classify a cell by position and obstacle mask.
#[inline]
pub fn classify(x: usize, y: usize, nx: usize, ny: usize, solid: &[bool]) -> CellClass {
    if solid[y * nx + x] {
        CellClass::Solid
    } else if x == 0 {
        CellClass::Inlet
    } else if x == nx - 1 {
        CellClass::Outlet
    } else if y == 0 {
        CellClass::WallBottom
    } else if y == ny - 1 {
        CellClass::WallTop
    } else {
        CellClass::Interior
    }
}
