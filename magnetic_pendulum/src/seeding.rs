//! Initial-condition policies
//!
//! A UI click hands the simulation one point; the policy turns it into one
//! starting position per body.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use crate::error::{ensure_non_negative, PendulumError, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SeedPolicy {
    /// One body exactly at the point.
    #[default]
    Single,
    /// `count` bodies spread evenly over an arc of `spread` radians, centred
    /// on the point and at the point's distance from the origin.
    Arc { count: usize, spread: f64 },
    /// `count` bodies scattered uniformly over a disc of `radius` around the point.
    Cluster { count: usize, radius: f64 },
}

impl SeedPolicy {
    pub fn body_count(&self) -> usize {
        match *self {
            SeedPolicy::Single => 1,
            SeedPolicy::Arc { count, .. } | SeedPolicy::Cluster { count, .. } => count,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            SeedPolicy::Single => {}
            SeedPolicy::Arc { spread, .. } => {
                ensure_non_negative("arc_spread", spread)?;
            }
            SeedPolicy::Cluster { radius, .. } => {
                ensure_non_negative("cluster_radius", radius)?;
            }
        }
        if self.body_count() == 0 {
            return Err(PendulumError::invalid("body_count", "at least one body is required"));
        }
        Ok(())
    }

    pub fn seed<R: Rng + ?Sized>(&self, point: DVec2, rng: &mut R) -> Vec<DVec2> {
        match *self {
            SeedPolicy::Single => vec![point],
            SeedPolicy::Arc { count, spread } => {
                let distance = point.length();
                let center = point.y.atan2(point.x);
                (0..count)
                    .map(|i| {
                        let offset = if count > 1 {
                            spread * (i as f64 / (count - 1) as f64 - 0.5)
                        } else {
                            0.0
                        };
                        let angle = center + offset;
                        DVec2::new(angle.cos() * distance, angle.sin() * distance)
                    })
                    .collect()
            }
            SeedPolicy::Cluster { count, radius } => (0..count)
                .map(|_| {
                    // sqrt keeps the density uniform over the disc
                    let distance = radius * rng.gen::<f64>().sqrt();
                    let angle = rng.gen::<f64>() * TAU;
                    point + DVec2::new(angle.cos() * distance, angle.sin() * distance)
                })
                .collect(),
        }
    }
}
