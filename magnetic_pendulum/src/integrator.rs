//! Time integrators for the pendulum state
//!
//! Two methods are available:
//! - classical fixed-step RK4, one stage set per `advance`
//! - Dormand–Prince 5(4), which sub-steps adaptively inside `advance` and
//!   carries its last accepted step size over to the next call
//!
//! Both land exactly on `t + dt`.

use crate::error::{ensure_positive, PendulumError, Result};
use crate::forces::derivative_into;
use crate::magnets::{Magnet, PhysicalParameters};
use crate::state::VectorState;

/// Smallest adaptive sub-step is `dt / MAX_SUBSTEPS`; steps that small are
/// accepted whatever their error estimate.
pub const MAX_SUBSTEPS: usize = 1000;

/// Integration scheme
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    Rk4,
    DormandPrince { atol: f64, rtol: f64 },
}

impl Method {
    pub fn validate(&self) -> Result<()> {
        if let Method::DormandPrince { atol, rtol } = *self {
            ensure_positive("atol", atol)?;
            ensure_positive("rtol", rtol)?;
        }
        Ok(())
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::DormandPrince {
            atol: 1e-9,
            rtol: 1e-7,
        }
    }
}

// Dormand–Prince tableau. Row i gives the weights of stages 0..=i used to
// build the input of stage i + 1; the last row is the 5th order solution.
const DP_A: [&[f64]; 6] = [
    &[1.0 / 5.0],
    &[3.0 / 40.0, 9.0 / 40.0],
    &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
    &[
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
    ],
    &[
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ],
    &[
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

// 5th minus 4th order weights
const DP_E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// `out = y + h · Σ weights[j] · stages[j]`
fn combine(y: &[f64], stages: &[Vec<f64>], weights: &[f64], h: f64, out: &mut [f64]) {
    out.copy_from_slice(y);
    for (k, &w) in stages.iter().zip(weights) {
        if w == 0.0 {
            continue;
        }
        let hw = h * w;
        for (o, &ki) in out.iter_mut().zip(k) {
            *o += hw * ki;
        }
    }
}

/// Owns the evolving state plus every buffer the stages need, so `advance`
/// never allocates.
#[derive(Debug, Clone)]
pub struct Integrator {
    method: Method,
    state: VectorState,
    time: f64,
    step_hint: Option<f64>,
    stages: Vec<Vec<f64>>,
    scratch: Vec<f64>,
    candidate: Vec<f64>,
}

impl Integrator {
    pub fn new(state: VectorState, method: Method) -> Self {
        let n = state.len();
        let stage_count = match method {
            Method::Rk4 => 4,
            Method::DormandPrince { .. } => 7,
        };
        Self {
            method,
            state,
            time: 0.0,
            step_hint: None,
            stages: vec![vec![0.0; n]; stage_count],
            scratch: vec![0.0; n],
            candidate: vec![0.0; n],
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn state(&self) -> &VectorState {
        &self.state
    }

    /// Simulated time since construction or the last `reinitialize`.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Step size the adaptive method will try first on the next `advance`.
    pub fn step_hint(&self) -> Option<f64> {
        self.step_hint
    }

    /// Advance the state by exactly `dt`.
    pub fn advance(
        &mut self,
        dt: f64,
        params: &PhysicalParameters,
        magnets: &[Magnet],
    ) -> Result<&VectorState> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(PendulumError::InvalidStep { dt });
        }

        match self.method {
            Method::Rk4 => self.rk4_step(dt, params, magnets),
            Method::DormandPrince { atol, rtol } => {
                self.adaptive_step(dt, atol, rtol, params, magnets)
            }
        }
        self.time += dt;

        Ok(&self.state)
    }

    /// Restart from `state` at time zero, dropping the step-size history.
    ///
    /// The body count is fixed for the integrator's lifetime.
    pub fn reinitialize(&mut self, state: VectorState) -> Result<()> {
        if state.len() != self.state.len() {
            return Err(PendulumError::StateSizeMismatch {
                expected: self.state.len(),
                actual: state.len(),
            });
        }
        self.state = state;
        self.time = 0.0;
        self.step_hint = None;
        Ok(())
    }

    fn rk4_step(&mut self, dt: f64, params: &PhysicalParameters, magnets: &[Magnet]) {
        let y = self.state.as_mut_slice();
        let [k1, k2, k3, k4] = &mut self.stages[..] else {
            unreachable!("rk4 keeps four stage buffers");
        };
        let tmp = &mut self.scratch;

        derivative_into(y, params, magnets, k1);

        for ((t, &yi), &ki) in tmp.iter_mut().zip(y.iter()).zip(k1.iter()) {
            *t = yi + 0.5 * dt * ki;
        }
        derivative_into(tmp, params, magnets, k2);

        for ((t, &yi), &ki) in tmp.iter_mut().zip(y.iter()).zip(k2.iter()) {
            *t = yi + 0.5 * dt * ki;
        }
        derivative_into(tmp, params, magnets, k3);

        for ((t, &yi), &ki) in tmp.iter_mut().zip(y.iter()).zip(k3.iter()) {
            *t = yi + dt * ki;
        }
        derivative_into(tmp, params, magnets, k4);

        for (i, yi) in y.iter_mut().enumerate() {
            *yi += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
    }

    fn adaptive_step(
        &mut self,
        dt: f64,
        atol: f64,
        rtol: f64,
        params: &PhysicalParameters,
        magnets: &[Magnet],
    ) {
        let h_min = dt / MAX_SUBSTEPS as f64;
        let mut h = self.step_hint.unwrap_or(dt).clamp(h_min, dt);
        let mut done = 0.0;

        while done < dt {
            let remaining = dt - done;
            let last = h >= remaining;
            let h_try = if last { remaining } else { h };

            let err = self.dopri_trial(h_try, atol, rtol, params, magnets);
            let factor = if err == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
            };

            if err <= 1.0 || h_try <= h_min {
                self.state.as_mut_slice().copy_from_slice(&self.candidate);
                done = if last { dt } else { done + h_try };
                let proposed = h_try * factor;
                h = if last { proposed.max(h) } else { proposed }.max(h_min);
            } else {
                h = (h_try * factor).max(h_min);
            }
        }

        self.step_hint = Some(h);
    }

    /// One Dormand–Prince step of size `h` from the current state. Leaves the
    /// 5th order result in `candidate` and returns the scaled error norm.
    fn dopri_trial(
        &mut self,
        h: f64,
        atol: f64,
        rtol: f64,
        params: &PhysicalParameters,
        magnets: &[Magnet],
    ) -> f64 {
        let y = self.state.as_slice();

        derivative_into(y, params, magnets, &mut self.stages[0]);
        for (s, weights) in DP_A.iter().enumerate() {
            let (done, rest) = self.stages.split_at_mut(s + 1);
            combine(y, done, weights, h, &mut self.scratch);
            derivative_into(&self.scratch, params, magnets, &mut rest[0]);
        }
        // The last tableau row is the solution itself.
        self.candidate.copy_from_slice(&self.scratch);

        let mut sum = 0.0;
        for i in 0..y.len() {
            let e: f64 = h * DP_E
                .iter()
                .zip(&self.stages)
                .map(|(&w, k)| w * k[i])
                .sum::<f64>();
            let scale = atol + rtol * y[i].abs().max(self.candidate[i].abs());
            sum += (e / scale).powi(2);
        }
        (sum / y.len() as f64).sqrt()
    }
}
