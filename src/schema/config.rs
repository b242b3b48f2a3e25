//! Configuration types for lattice Boltzmann simulation parameters.

use serde::{Deserialize, Serialize};

/// Default domain extent (unit square).
fn default_extent() -> f32 {
    1.0
}

/// Top-level simulation configuration.
///
/// All physical parameters are fixed at construction; the relaxation time
/// tau is derived from the target Reynolds number and grid resolution via
/// `tau = 3 * nu * N + 0.5` with `nu = u_in * length / reynolds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid resolution N: cells per unit of domain length.
    pub resolution: usize,
    /// Domain extent in x, in units of the reference length.
    #[serde(default = "default_extent")]
    pub domain_x: f32,
    /// Domain extent in y, in units of the reference length.
    #[serde(default = "default_extent")]
    pub domain_y: f32,
    /// Prescribed inlet velocity u_in (lattice units, must be < 1).
    pub inlet_velocity: f32,
    /// Characteristic length L of the obstacle.
    pub characteristic_length: f32,
    /// Target Reynolds number.
    pub reynolds: f32,
    /// Immersed obstacle geometry.
    pub obstacle: ObstacleConfig,
    /// How streaming resolves pulls whose source column falls outside the domain.
    #[serde(default)]
    pub edge_policy: EdgePolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            resolution: 200,
            domain_x: 1.0,
            domain_y: 1.0,
            inlet_velocity: 0.1,
            characteristic_length: 0.125,
            reynolds: 200.0,
            obstacle: ObstacleConfig::default(),
            edge_policy: EdgePolicy::default(),
        }
    }
}

/// Circular obstacle placed in the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Center in normalized domain coordinates (x in [0, domain_x], y in [0, domain_y]).
    pub center: (f32, f32),
    /// Radius in domain units.
    pub radius: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            center: (0.1, 0.5),
            radius: 0.0625,
        }
    }
}

/// Resolution policy for streaming pulls that leave the domain in x.
///
/// The north/south walls always mirror (bounce-back); this policy only
/// governs the inlet/outlet columns, whose populations are overwritten by
/// the boundary operators immediately after streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Pull from the nearest in-domain column (zero-gradient).
    #[default]
    Clamp,
    /// Mirror the direction back onto itself, as at the channel walls.
    Bounce,
}

impl SimulationConfig {
    /// Grid width in cells.
    #[inline]
    pub fn nx(&self) -> usize {
        (self.domain_x * self.resolution as f32) as usize
    }

    /// Grid height in cells.
    #[inline]
    pub fn ny(&self) -> usize {
        (self.domain_y * self.resolution as f32) as usize
    }

    /// Cell size dx = 1/N.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        1.0 / self.resolution as f32
    }

    /// Kinematic viscosity nu = u_in * L / Re.
    #[inline]
    pub fn viscosity(&self) -> f32 {
        self.inlet_velocity * self.characteristic_length / self.reynolds
    }

    /// Relaxation time tau = 3 * nu * N + 0.5.
    #[inline]
    pub fn tau(&self) -> f32 {
        3.0 * self.viscosity() * self.resolution as f32 + 0.5
    }

    /// Validate configuration parameters.
    ///
    /// All failure modes here are fatal and reported before the first step:
    /// a tau at or below 0.5 makes the BGK operator unstable, and an inlet
    /// velocity at or above 1 makes the Zou-He density reconstruction divide
    /// by a non-positive denominator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 || self.nx() < 3 || self.ny() < 3 {
            return Err(ConfigError::InvalidDimensions {
                nx: self.nx(),
                ny: self.ny(),
            });
        }
        if !(0.0..1.0).contains(&self.inlet_velocity) {
            return Err(ConfigError::InvalidInletVelocity {
                u_in: self.inlet_velocity,
            });
        }
        if self.characteristic_length <= 0.0 || self.reynolds <= 0.0 {
            return Err(ConfigError::InvalidFlowParameters {
                length: self.characteristic_length,
                reynolds: self.reynolds,
            });
        }
        let tau = self.tau();
        if !tau.is_finite() || tau <= 0.5 {
            return Err(ConfigError::UnstableRelaxation { tau });
        }
        let (cx, cy) = self.obstacle.center;
        if self.obstacle.radius <= 0.0
            || !(0.0..=self.domain_x).contains(&cx)
            || !(0.0..=self.domain_y).contains(&cy)
        {
            return Err(ConfigError::InvalidObstacle);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions too small: {nx}x{ny} (need at least 3x3)")]
    InvalidDimensions { nx: usize, ny: usize },
    #[error("Inlet velocity {u_in} must lie in [0, 1)")]
    InvalidInletVelocity { u_in: f32 },
    #[error("Characteristic length {length} and Reynolds number {reynolds} must be positive")]
    InvalidFlowParameters { length: f32, reynolds: f32 },
    #[error("Relaxation time tau = {tau} is unstable (must exceed 0.5)")]
    UnstableRelaxation { tau: f32 },
    #[error("Obstacle must have positive radius and lie inside the domain")]
    InvalidObstacle,
}
