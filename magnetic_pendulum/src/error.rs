//! Error types for the pendulum engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PendulumError {
    #[error("invalid time step {dt}: must be positive and finite")]
    InvalidStep { dt: f64 },

    #[error("state size mismatch: expected {expected} values, got {actual}")]
    StateSizeMismatch { expected: usize, actual: usize },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("failed to start animation thread: {0}")]
    LoopSpawn(#[from] std::io::Error),
}

impl PendulumError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PendulumError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PendulumError>;

/// Reject NaN and infinities.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PendulumError::invalid(name, format!("{value} is not finite")))
    }
}

/// Reject negative or non-finite values.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(PendulumError::invalid(name, format!("{value} is negative")));
    }
    Ok(value)
}

/// Reject zero, negative or non-finite values.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    ensure_finite(name, value)?;
    if value <= 0.0 {
        return Err(PendulumError::invalid(
            name,
            format!("{value} must be greater than zero"),
        ));
    }
    Ok(value)
}
