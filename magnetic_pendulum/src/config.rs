//! In-memory configuration for a simulation session
//!
//! `SimulationConfig::default()` is the single-body demo; `many_body(n)`
//! is the fan of `n` pendulums used to visualise basins of attraction.

use std::time::Duration;

use common::constants;
use glam::DVec2;

use crate::error::{PendulumError, Result};
use crate::integrator::Method;
use crate::magnets::{MagnetArray, PhysicalParameters};
use crate::seeding::SeedPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Integration step taken by every `step()`
    pub dt: f64,
    /// Points kept per body trail
    pub trail_capacity: usize,
    pub physics: PhysicalParameters,
    pub magnets: MagnetArray,
    pub seed_policy: SeedPolicy,
    /// Point handed to `seed_policy` for the first run
    pub initial_point: DVec2,
    pub method: Method,
    /// Fixed seed for randomized seeding; `None` draws from the OS
    pub rng_seed: Option<u64>,
}

impl SimulationConfig {
    /// One pendulum over three fixed magnets.
    pub fn single_body() -> Self {
        Self {
            dt: constants::DT,
            trail_capacity: constants::TRAIL_LENGTH,
            physics: PhysicalParameters::default(),
            magnets: MagnetArray::default(),
            seed_policy: SeedPolicy::Single,
            initial_point: DVec2::new(1.5, 1.5),
            method: Method::default(),
            rng_seed: None,
        }
    }

    /// `bodies` pendulums started on a narrow arc, with an adjustable magnet count.
    pub fn many_body(bodies: usize) -> Self {
        Self {
            trail_capacity: 200,
            magnets: MagnetArray::default()
                .with_count_bounds(constants::MIN_MAGNETS..=constants::MAX_MAGNETS),
            seed_policy: SeedPolicy::Arc {
                count: bodies,
                spread: 0.05,
            },
            initial_point: DVec2::new(1.5, 0.0),
            ..Self::single_body()
        }
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_trail_capacity(mut self, capacity: usize) -> Self {
        self.trail_capacity = capacity;
        self
    }

    pub fn with_physics(mut self, physics: PhysicalParameters) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_magnets(mut self, magnets: MagnetArray) -> Self {
        self.magnets = magnets;
        self
    }

    pub fn with_seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.seed_policy = policy;
        self
    }

    pub fn with_initial_point(mut self, point: DVec2) -> Self {
        self.initial_point = point;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(PendulumError::InvalidStep { dt: self.dt });
        }
        if self.trail_capacity == 0 {
            return Err(PendulumError::invalid(
                "trail_capacity",
                "a trail needs at least one point",
            ));
        }
        if !self.initial_point.is_finite() {
            return Err(PendulumError::invalid(
                "initial_point",
                format!("{} is not finite", self.initial_point),
            ));
        }
        self.physics.validate()?;
        self.magnets.validate()?;
        self.seed_policy.validate()?;
        self.method.validate()?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::single_body()
    }
}

/// Animation loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Pause after every frame; the loop never spins without it
    pub idle_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            idle_interval: constants::IDLE_INTERVAL,
        }
    }
}
