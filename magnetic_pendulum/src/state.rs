//! Flat position/velocity state for a set of independent bodies
//!
//! Layout per body is `[x, y, vx, vy]`, so a state for `n` bodies holds
//! exactly `4n` values for its whole lifetime.

use glam::DVec2;

use crate::error::{PendulumError, Result};

/// Number of scalars stored per body
pub const STRIDE: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct VectorState {
    values: Vec<f64>,
}

impl VectorState {
    /// Bodies at the given positions, all at rest.
    pub fn at_rest(positions: &[DVec2]) -> Self {
        let values = positions
            .iter()
            .flat_map(|p| [p.x, p.y, 0.0, 0.0])
            .collect();
        Self { values }
    }

    /// One entry per body of `(position, velocity)`.
    pub fn from_bodies(bodies: &[(DVec2, DVec2)]) -> Self {
        let values = bodies
            .iter()
            .flat_map(|(p, v)| [p.x, p.y, v.x, v.y])
            .collect();
        Self { values }
    }

    /// Wrap a raw vector, which must hold a whole number of bodies.
    pub fn from_raw(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() || values.len() % STRIDE != 0 {
            let expected = (values.len() / STRIDE).max(1) * STRIDE;
            return Err(PendulumError::StateSizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { values })
    }

    pub(crate) fn zeros(bodies: usize) -> Self {
        Self {
            values: vec![0.0; bodies * STRIDE],
        }
    }

    pub fn body_count(&self) -> usize {
        self.values.len() / STRIDE
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn position(&self, body: usize) -> DVec2 {
        let i = body * STRIDE;
        DVec2::new(self.values[i], self.values[i + 1])
    }

    pub fn velocity(&self, body: usize) -> DVec2 {
        let i = body * STRIDE;
        DVec2::new(self.values[i + 2], self.values[i + 3])
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.values
            .chunks_exact(STRIDE)
            .map(|c| DVec2::new(c[0], c[1]))
    }

    pub fn velocities(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.values
            .chunks_exact(STRIDE)
            .map(|c| DVec2::new(c[2], c[3]))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// True when every value is finite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
