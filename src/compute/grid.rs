//! Grid storage - double-buffered population fields, macroscopic field,
//! obstacle mask.
//!
//! Populations live in two generations: "current" is read-only during a
//! pass, "next" is write-only. A pass that mutates populations must write a
//! complete next generation; the solver then swaps the two by handle
//! exchange, never by copying data.

use super::lattice::{E, equilibrium};

/// One generation of D2Q9 populations, stored as nine per-direction planes.
///
/// Each plane is a flat row-major grid: index = y * nx + x.
pub struct PopulationField {
    planes: [Vec<f32>; 9],
    nx: usize,
    ny: usize,
}

impl PopulationField {
    /// Allocate a zeroed field.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            planes: std::array::from_fn(|_| vec![0.0f32; nx * ny]),
            nx,
            ny,
        }
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Convert (x, y) coordinates to flat index.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.nx + x
    }

    /// Read-only view of the plane for direction `i`.
    #[inline]
    pub fn plane(&self, i: usize) -> &[f32] {
        &self.planes[i]
    }

    /// Mutable view of the plane for direction `i`.
    #[inline]
    pub fn plane_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.planes[i]
    }

    /// Population value for direction `i` at (x, y).
    #[inline]
    pub fn get(&self, i: usize, x: usize, y: usize) -> f32 {
        self.planes[i][y * self.nx + x]
    }

    /// Overwrite every plane from `other`. Plane-wise memcpy, used by the
    /// boundary operators that rewrite only one column of the grid.
    pub fn copy_from(&mut self, other: &PopulationField) {
        for (dst, src) in self.planes.iter_mut().zip(other.planes.iter()) {
            dst.copy_from_slice(src);
        }
    }

    /// Set every cell to the equilibrium distribution for (rho, u).
    pub fn fill_equilibrium(&mut self, rho: f32, ux: f32, uy: f32) {
        for i in 0..9 {
            let feq = equilibrium(i, rho, ux, uy);
            self.planes[i].fill(feq);
        }
    }

    /// Total population mass, summed over all directions and cells.
    pub fn total_mass(&self) -> f64 {
        self.planes
            .iter()
            .map(|p| p.iter().map(|&v| v as f64).sum::<f64>())
            .sum()
    }
}

/// Macroscopic field: velocity and density planes, single generation.
///
/// Overwritten in place by recovery each step; read-only to external
/// consumers such as a renderer.
pub struct MacroscopicField {
    pub ux: Vec<f32>,
    pub uy: Vec<f32>,
    pub rho: Vec<f32>,
    nx: usize,
}

impl MacroscopicField {
    /// Allocate a field at the rest state (rho = 1, u = 0).
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            ux: vec![0.0f32; nx * ny],
            uy: vec![0.0f32; nx * ny],
            rho: vec![1.0f32; nx * ny],
            nx,
        }
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Velocity magnitude at a flat index, for display consumers.
    #[inline]
    pub fn speed(&self, idx: usize) -> f32 {
        (self.ux[idx] * self.ux[idx] + self.uy[idx] * self.uy[idx]).sqrt()
    }
}

/// Simulation grid: two population generations, the macroscopic field, and
/// the obstacle mask.
pub struct Grid {
    pub current: PopulationField,
    pub next: PopulationField,
    pub macroscopic: MacroscopicField,
    pub solid: Vec<bool>,
    nx: usize,
    ny: usize,
}

impl Grid {
    /// Allocate a grid with populations at the rest equilibrium.
    pub fn new(nx: usize, ny: usize) -> Self {
        let mut current = PopulationField::new(nx, ny);
        current.fill_equilibrium(1.0, 0.0, 0.0);
        Self {
            current,
            next: PopulationField::new(nx, ny),
            macroscopic: MacroscopicField::new(nx, ny),
            solid: vec![false; nx * ny],
            nx,
            ny,
        }
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Swap population generations (handle exchange, no data copy).
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Momentum of one cell, summed over directions: (sum f_i ex, sum f_i ey).
    pub fn cell_momentum(&self, x: usize, y: usize) -> (f32, f32) {
        let idx = self.current.idx(x, y);
        let mut mx = 0.0f32;
        let mut my = 0.0f32;
        for i in 0..9 {
            let f = self.current.plane(i)[idx];
            mx += f * E[i][0] as f32;
            my += f * E[i][1] as f32;
        }
        (mx, my)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::lattice::W;

    #[test]
    fn test_rest_initialization_matches_weights() {
        let grid = Grid::new(8, 8);
        for i in 0..9 {
            for &v in grid.current.plane(i) {
                assert!((v - W[i]).abs() < 1e-7, "f_{} = {} != w_{}", i, v, i);
            }
        }
    }

    #[test]
    fn test_rest_cell_mass_is_unity() {
        let grid = Grid::new(4, 4);
        let idx = grid.current.idx(2, 2);
        let sum: f32 = (0..9).map(|i| grid.current.plane(i)[idx]).sum();
        assert!((sum - 1.0).abs() < 1e-6, "cell mass {} != 1", sum);
    }

    #[test]
    fn test_swap_exchanges_generations() {
        let mut grid = Grid::new(4, 4);
        grid.next.plane_mut(1)[0] = 42.0;
        grid.swap();
        assert_eq!(grid.current.plane(1)[0], 42.0);
        assert!((grid.next.plane(1)[0] - W[1]).abs() < 1e-7);
    }

    #[test]
    fn test_rest_momentum_is_zero() {
        let grid = Grid::new(4, 4);
        let (mx, my) = grid.cell_momentum(1, 1);
        assert!(mx.abs() < 1e-7 && my.abs() < 1e-7);
    }

    #[test]
    fn test_copy_from() {
        let mut a = PopulationField::new(3, 3);
        let mut b = PopulationField::new(3, 3);
        a.fill_equilibrium(1.2, 0.05, 0.0);
        b.copy_from(&a);
        for i in 0..9 {
            assert_eq!(a.plane(i), b.plane(i));
        }
    }
}
