//! Simulation-specific error types.
//!
//! The per-tick core has no recoverable-failure concept: degenerate geometry
//! (zero-length directions, vanishing gravity) short-circuits to a safe no-op
//! at the use site instead of propagating. What remains is configuration
//! validation, run once at startup — misordered radii or non-positive
//! thresholds are reported through these types and logged, not panicked on.

use std::fmt;

/// Top-level error enum for the flight simulation.
#[derive(Debug)]
pub enum SimError {
    /// A tuning value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// Two tuning values that must be ordered relative to each other are not.
    MisorderedRange {
        /// Name of the gradient or band being validated.
        name: &'static str,
        low: f32,
        high: f32,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::MisorderedRange { name, low, high } => write!(
                f,
                "range '{}' is misordered: expected {} < {}",
                name, low, high
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// The lunar gradient needs `full < enter` or the blend factor inverts.
pub fn validate_moon_radii(enter: f32, full: f32) -> SimResult<()> {
    if full >= enter {
        Err(SimError::MisorderedRange {
            name: "moon radius gradient",
            low: full,
            high: enter,
        })
    } else {
        Ok(())
    }
}

/// The zero-g band needs `start < full` or the altitude fade inverts.
pub fn validate_zero_g_band(start: f32, full: f32) -> SimResult<()> {
    if start >= full {
        Err(SimError::MisorderedRange {
            name: "zero-g altitude band",
            low: start,
            high: full,
        })
    } else {
        Ok(())
    }
}

/// Landing thresholds must be strictly positive; a zero `safe_speed` would
/// divide by zero in the speed sub-score.
pub fn validate_landing_rules(safe_speed: f32, safe_angle_deg: f32, safe_vertical: f32) -> SimResult<()> {
    if safe_speed <= 0.0 {
        return Err(SimError::UnsafeConstant {
            name: "safe_speed",
            value: safe_speed,
            safe_range: "(0.0, ∞)",
        });
    }
    if safe_angle_deg <= 0.0 {
        return Err(SimError::UnsafeConstant {
            name: "safe_angle_deg",
            value: safe_angle_deg,
            safe_range: "(0.0, ∞)",
        });
    }
    if safe_vertical <= 0.0 {
        return Err(SimError::UnsafeConstant {
            name: "safe_vertical_speed",
            value: safe_vertical,
            safe_range: "(0.0, ∞)",
        });
    }
    Ok(())
}

/// A non-positive smoothing rate would freeze the gravity field at its
/// initial value.
pub fn validate_gravity_smooth(rate: f32) -> SimResult<()> {
    if rate <= 0.0 {
        Err(SimError::UnsafeConstant {
            name: "gravity_smooth",
            value: rate,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}
