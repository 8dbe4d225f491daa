//! Thread-safe handle to a [`Simulation`]
//!
//! The animation thread and UI callbacks each hold a clone. Every operation
//! takes the same lock for its whole duration, so a `step` never sees a
//! half-applied reinitialize or parameter change.

use std::sync::Arc;

use glam::DVec2;
use parking_lot::Mutex;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::magnets::Polarity;
use crate::simulation::{Frame, Simulation};

#[derive(Clone)]
pub struct SimulationController {
    inner: Arc<Mutex<Simulation>>,
}

impl SimulationController {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Ok(Self::from_simulation(Simulation::new(config)?))
    }

    pub fn from_simulation(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    pub fn step(&self) -> Result<Frame> {
        self.inner.lock().step()
    }

    pub fn reinitialize(&self, positions: &[DVec2]) -> Result<()> {
        self.inner.lock().reinitialize(positions)
    }

    pub fn reinitialize_at(&self, point: DVec2) -> Result<()> {
        self.inner.lock().reinitialize_at(point)
    }

    pub fn set_friction(&self, friction: f64) -> Result<()> {
        self.inner.lock().set_friction(friction)
    }

    pub fn set_restoring(&self, restoring: f64) -> Result<()> {
        self.inner.lock().set_restoring(restoring)
    }

    pub fn set_magnet_height(&self, height: f64) -> Result<()> {
        self.inner.lock().set_magnet_height(height)
    }

    pub fn set_magnet_strength(&self, magnitude: f64) -> Result<()> {
        self.inner.lock().set_magnet_strength(magnitude)
    }

    pub fn set_magnet_count(&self, count: usize) -> Result<()> {
        self.inner.lock().set_magnet_count(count)
    }

    pub fn set_magnet_radius(&self, radius: f64) -> Result<()> {
        self.inner.lock().set_magnet_radius(radius)
    }

    pub fn set_polarity(&self, polarity: Polarity) {
        self.inner.lock().set_polarity(polarity)
    }

    pub fn toggle_polarity(&self) -> Polarity {
        self.inner.lock().toggle_polarity()
    }

    pub fn frame(&self) -> Frame {
        self.inner.lock().frame()
    }

    /// Run `f` with shared access to the simulation while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&self.inner.lock())
    }
}
