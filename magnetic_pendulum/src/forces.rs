//! Force model for the damped, magnetically forced pendulum
//!
//! For each body:
//!
//! ```text
//! dx/dt = v
//! dv/dt = -k·x - γ·v + Σ -s_k (x - m_k) / (|x - m_k|² + h²)^{3/2}
//! ```
//!
//! Bodies never interact, so every body's derivative depends only on its own
//! four state values.

use glam::DVec2;

use crate::magnets::{Magnet, PhysicalParameters};
use crate::state::{VectorState, STRIDE};

/// Acceleration contributed by the magnets at `position`.
///
/// With `h > 0` the denominator is at least `h³`, so a body sitting exactly
/// above a magnet is still well defined.
pub fn magnetic_acceleration(position: DVec2, magnets: &[Magnet], height: f64) -> DVec2 {
    let h2 = height * height;
    magnets.iter().fold(DVec2::ZERO, |acc, magnet| {
        let r = position - magnet.position;
        let dist_sq = r.length_squared() + h2;
        acc - r * (magnet.strength / (dist_sq * dist_sq.sqrt()))
    })
}

/// Total acceleration of a single body.
pub fn acceleration(
    position: DVec2,
    velocity: DVec2,
    params: &PhysicalParameters,
    magnets: &[Magnet],
) -> DVec2 {
    -params.restoring * position - params.friction * velocity
        + magnetic_acceleration(position, magnets, params.height)
}

/// Write the time derivative of `state` into `out`.
///
/// Both slices use the `[x, y, vx, vy]` per-body layout and must have the
/// same length.
pub fn derivative_into(
    state: &[f64],
    params: &PhysicalParameters,
    magnets: &[Magnet],
    out: &mut [f64],
) {
    debug_assert_eq!(state.len(), out.len());

    for (body, d) in state.chunks_exact(STRIDE).zip(out.chunks_exact_mut(STRIDE)) {
        let position = DVec2::new(body[0], body[1]);
        let velocity = DVec2::new(body[2], body[3]);
        let a = acceleration(position, velocity, params, magnets);

        d[0] = velocity.x;
        d[1] = velocity.y;
        d[2] = a.x;
        d[3] = a.y;
    }
}

/// Allocating form of [`derivative_into`].
pub fn derivative(
    state: &VectorState,
    params: &PhysicalParameters,
    magnets: &[Magnet],
) -> VectorState {
    let mut out = VectorState::zeros(state.body_count());
    derivative_into(state.as_slice(), params, magnets, out.as_mut_slice());
    out
}
