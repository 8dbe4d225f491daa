//! Magnets, their circular arrangement, and the shared physical parameters

use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use glam::DVec2;

use crate::error::{ensure_non_negative, ensure_positive, PendulumError, Result};

/// A point source below the pendulum plane.
///
/// Positive strength attracts, negative repels. All magnets share the plane
/// height stored in [`PhysicalParameters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnet {
    pub position: DVec2,
    pub strength: f64,
}

impl Magnet {
    pub fn new(position: DVec2, strength: f64) -> Self {
        Self { position, strength }
    }
}

/// Sign applied to every magnet's strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    Attract,
    Repel,
}

impl Polarity {
    pub fn sign(self) -> f64 {
        match self {
            Polarity::Attract => 1.0,
            Polarity::Repel => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Polarity::Attract => Polarity::Repel,
            Polarity::Repel => Polarity::Attract,
        }
    }

    /// UI toggles report "repel" as `true`.
    pub fn from_repel(repel: bool) -> Self {
        if repel {
            Polarity::Repel
        } else {
            Polarity::Attract
        }
    }
}

impl TryFrom<i32> for Polarity {
    type Error = PendulumError;

    fn try_from(sign: i32) -> Result<Self> {
        match sign {
            1 => Ok(Polarity::Attract),
            -1 => Ok(Polarity::Repel),
            other => Err(PendulumError::invalid(
                "polarity",
                format!("sign must be +1 or -1, got {other}"),
            )),
        }
    }
}

/// Describes `count` equal magnets evenly spaced on a circle.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnetArray {
    pub count: usize,
    pub radius: f64,
    /// Unsigned strength; the sign comes from `polarity`.
    pub magnitude: f64,
    pub polarity: Polarity,
    pub count_bounds: RangeInclusive<usize>,
}

impl MagnetArray {
    pub fn new(count: usize, radius: f64, magnitude: f64) -> Self {
        Self {
            count,
            radius,
            magnitude,
            polarity: Polarity::Attract,
            count_bounds: count..=count,
        }
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_count_bounds(mut self, bounds: RangeInclusive<usize>) -> Self {
        self.count_bounds = bounds;
        self
    }

    pub fn signed_strength(&self) -> f64 {
        self.magnitude * self.polarity.sign()
    }

    /// Magnet 0 sits on the positive x axis, the rest follow counter-clockwise.
    pub fn layout(&self) -> Vec<Magnet> {
        let strength = self.signed_strength();
        (0..self.count)
            .map(|i| {
                let angle = TAU * i as f64 / self.count as f64;
                let position = DVec2::new(angle.cos(), angle.sin()) * self.radius;
                Magnet::new(position, strength)
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.count_bounds.is_empty() || *self.count_bounds.start() == 0 {
            return Err(PendulumError::invalid(
                "magnet_count_bounds",
                format!("{:?} must be a non-empty range starting at 1 or more", self.count_bounds),
            ));
        }
        self.check_count(self.count)?;
        ensure_non_negative("magnet_radius", self.radius)?;
        ensure_non_negative("magnet_strength", self.magnitude)?;
        Ok(())
    }

    pub(crate) fn check_count(&self, count: usize) -> Result<usize> {
        if self.count_bounds.contains(&count) {
            Ok(count)
        } else {
            Err(PendulumError::invalid(
                "magnet_count",
                format!(
                    "{count} outside {}..={}",
                    self.count_bounds.start(),
                    self.count_bounds.end()
                ),
            ))
        }
    }
}

impl Default for MagnetArray {
    fn default() -> Self {
        use common::constants::*;
        Self::new(3, MAGNET_RADIUS, MAGNET_STRENGTH)
    }
}

/// Coefficients read by the force model on every evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParameters {
    /// Gravitation-like restoring coefficient k
    pub restoring: f64,
    /// Velocity damping γ
    pub friction: f64,
    /// Vertical distance h between the pendulum plane and the magnets
    pub height: f64,
}

impl PhysicalParameters {
    pub fn new(restoring: f64, friction: f64, height: f64) -> Self {
        Self {
            restoring,
            friction,
            height,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("restoring", self.restoring)?;
        ensure_non_negative("friction", self.friction)?;
        ensure_positive("magnet_height", self.height)?;
        Ok(())
    }
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        use common::constants::*;
        Self::new(RESTORING, FRICTION, MAGNET_HEIGHT)
    }
}
