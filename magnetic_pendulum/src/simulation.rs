//! Single-owner simulation: integrator, magnets, parameters and trails
//!
//! Every mutating method validates its input before touching any field, so
//! a failed call leaves the simulation exactly as it was.

use glam::DVec2;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimulationConfig;
use crate::error::{ensure_non_negative, ensure_positive, PendulumError, Result};
use crate::integrator::Integrator;
use crate::magnets::{Magnet, MagnetArray, PhysicalParameters, Polarity};
use crate::seeding::SeedPolicy;
use crate::state::{VectorState, STRIDE};
use crate::trajectory::TrajectoryHistory;

/// What a renderer needs after one step. Owned, so it can outlive the lock
/// it was produced under.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Number of steps since the last reinitialize
    pub step_index: u64,
    pub time: f64,
    pub positions: Vec<DVec2>,
    /// One trail per body, oldest point first
    pub trails: Vec<Vec<DVec2>>,
}

pub struct Simulation {
    dt: f64,
    integrator: Integrator,
    physics: PhysicalParameters,
    magnet_array: MagnetArray,
    magnets: Vec<Magnet>,
    positions: Vec<DVec2>,
    trails: Vec<TrajectoryHistory>,
    seed_policy: SeedPolicy,
    rng: StdRng,
    steps: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let positions = config.seed_policy.seed(config.initial_point, &mut rng);
        let trails = positions
            .iter()
            .map(|&p| TrajectoryHistory::new(config.trail_capacity, p))
            .collect::<Result<Vec<_>>>()?;
        let integrator = Integrator::new(VectorState::at_rest(&positions), config.method);

        debug!(
            "simulation created: {} bodies, {} magnets, trail length {}",
            positions.len(),
            config.magnets.count,
            config.trail_capacity
        );

        Ok(Self {
            dt: config.dt,
            integrator,
            physics: config.physics,
            magnets: config.magnets.layout(),
            magnet_array: config.magnets,
            positions,
            trails,
            seed_policy: config.seed_policy,
            rng,
            steps: 0,
        })
    }

    /// Advance by one `dt`, append every body's new position to its trail and
    /// return the resulting frame.
    pub fn step(&mut self) -> Result<Frame> {
        let state = self.integrator.advance(self.dt, &self.physics, &self.magnets)?;

        for ((slot, trail), position) in self
            .positions
            .iter_mut()
            .zip(self.trails.iter_mut())
            .zip(state.positions())
        {
            *slot = position;
            trail.push(position);
        }
        self.steps += 1;

        Ok(self.frame())
    }

    /// Restart every body at rest at `positions` and refill each trail with
    /// its body's new position.
    pub fn reinitialize(&mut self, positions: &[DVec2]) -> Result<()> {
        if positions.len() != self.positions.len() {
            return Err(PendulumError::StateSizeMismatch {
                expected: self.positions.len() * STRIDE,
                actual: positions.len() * STRIDE,
            });
        }
        if let Some(bad) = positions.iter().find(|p| !p.is_finite()) {
            return Err(PendulumError::invalid(
                "positions",
                format!("{bad} is not finite"),
            ));
        }

        self.integrator.reinitialize(VectorState::at_rest(positions))?;
        self.positions.copy_from_slice(positions);
        for (trail, &p) in self.trails.iter_mut().zip(positions) {
            trail.reset_to(p);
        }
        self.steps = 0;

        debug!("reinitialized {} bodies", positions.len());
        Ok(())
    }

    /// Seed new starting positions from `point` with the configured policy,
    /// then reinitialize.
    pub fn reinitialize_at(&mut self, point: DVec2) -> Result<()> {
        if !point.is_finite() {
            return Err(PendulumError::invalid(
                "point",
                format!("{point} is not finite"),
            ));
        }
        let positions = self.seed_policy.seed(point, &mut self.rng);
        self.reinitialize(&positions)
    }

    pub fn set_friction(&mut self, friction: f64) -> Result<()> {
        self.physics.friction = ensure_non_negative("friction", friction)?;
        debug!("friction set to {friction}");
        Ok(())
    }

    pub fn set_restoring(&mut self, restoring: f64) -> Result<()> {
        self.physics.restoring = ensure_non_negative("restoring", restoring)?;
        debug!("restoring coefficient set to {restoring}");
        Ok(())
    }

    /// Magnet plane height; zero would make the force singular.
    pub fn set_magnet_height(&mut self, height: f64) -> Result<()> {
        self.physics.height = ensure_positive("magnet_height", height)?;
        debug!("magnet height set to {height}");
        Ok(())
    }

    /// Set the unsigned strength; the current polarity supplies the sign.
    pub fn set_magnet_strength(&mut self, magnitude: f64) -> Result<()> {
        self.magnet_array.magnitude = ensure_non_negative("magnet_strength", magnitude)?;
        let strength = self.magnet_array.signed_strength();
        for magnet in &mut self.magnets {
            magnet.strength = strength;
        }
        debug!("magnet strength set to {strength}");
        Ok(())
    }

    pub fn set_magnet_count(&mut self, count: usize) -> Result<()> {
        self.magnet_array.count = self.magnet_array.check_count(count)?;
        self.magnets = self.magnet_array.layout();
        debug!("magnet count set to {count}");
        Ok(())
    }

    pub fn set_magnet_radius(&mut self, radius: f64) -> Result<()> {
        self.magnet_array.radius = ensure_non_negative("magnet_radius", radius)?;
        self.magnets = self.magnet_array.layout();
        debug!("magnet radius set to {radius}");
        Ok(())
    }

    pub fn set_polarity(&mut self, polarity: Polarity) {
        if polarity == self.magnet_array.polarity {
            return;
        }
        self.magnet_array.polarity = polarity;
        for magnet in &mut self.magnets {
            magnet.strength = -magnet.strength;
        }
        debug!("polarity set to {polarity:?}");
    }

    pub fn toggle_polarity(&mut self) -> Polarity {
        let polarity = self.magnet_array.polarity.flipped();
        self.set_polarity(polarity);
        polarity
    }

    /// Current positions and full trails.
    pub fn frame(&self) -> Frame {
        Frame {
            step_index: self.steps,
            time: self.integrator.time(),
            positions: self.positions.clone(),
            trails: self.trails.iter().map(TrajectoryHistory::snapshot).collect(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.positions.len()
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn time(&self) -> f64 {
        self.integrator.time()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    pub fn state(&self) -> &VectorState {
        self.integrator.state()
    }

    pub fn trails(&self) -> &[TrajectoryHistory] {
        &self.trails
    }

    pub fn magnets(&self) -> &[Magnet] {
        &self.magnets
    }

    pub fn magnet_array(&self) -> &MagnetArray {
        &self.magnet_array
    }

    pub fn physics(&self) -> &PhysicalParameters {
        &self.physics
    }

    /// Sum of ½|v|² over all bodies (unit mass).
    pub fn kinetic_energy(&self) -> f64 {
        self.integrator
            .state()
            .velocities()
            .map(|v| 0.5 * v.length_squared())
            .sum()
    }
}
