//! Common utilities for the pendulum simulations
//!
//! This crate provides the reference constants and logger setup shared by
//! the single-body and many-body magnetic pendulum programs.

pub mod logging;

pub use logging::init_logging;

/// Reference values used by the simulations
pub mod constants {
    use std::time::Duration;

    /// Fixed integration step per animation frame (simulation time units)
    pub const DT: f64 = 0.005;

    /// Minimum pause between two animation iterations
    pub const IDLE_INTERVAL: Duration = Duration::from_millis(1);

    /// Gravitation-like restoring coefficient k
    pub const RESTORING: f64 = 1.0;

    /// Velocity damping coefficient γ
    pub const FRICTION: f64 = 0.3;

    /// Height of the magnet plane below the pendulum plane
    pub const MAGNET_HEIGHT: f64 = 0.3;

    /// Radius of the circle the magnets sit on
    pub const MAGNET_RADIUS: f64 = 1.0;

    /// Unsigned magnet strength
    pub const MAGNET_STRENGTH: f64 = 1.0;

    /// Fewest magnets allowed in the many-body variant
    pub const MIN_MAGNETS: usize = 1;

    /// Most magnets allowed in the many-body variant
    pub const MAX_MAGNETS: usize = 10;

    /// Number of trail points kept per body
    pub const TRAIL_LENGTH: usize = 500;
}
