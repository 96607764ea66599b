use crate::error::{SimulationError, SimulationResult};
use serde::{Deserialize, Serialize};

/// Gravitational acceleration in in/s².
pub const STANDARD_GRAVITY: f64 = 386.4;

/// Physical constants of the quarter car.
///
/// Units must be consistent; the defaults use inch-pound-second units
/// (masses in lb-s²/in, damping in lb-s/in, stiffness in lb/in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspensionParameters {
    /// Unsprung (wheel) mass.
    pub wheel_mass: f64,
    /// Sprung (car body) mass.
    pub car_mass: f64,
    pub shock_damping: f64,
    pub tire_damping: f64,
    pub spring_stiffness: f64,
    pub tire_stiffness: f64,
    pub gravity: f64,
}

impl Default for SuspensionParameters {
    fn default() -> Self {
        Self {
            shock_damping: 10.0,
            tire_damping: 1.0,
            spring_stiffness: 250.0,
            tire_stiffness: 2000.0,
            ..Self::from_weights(50.0, 1500.0, STANDARD_GRAVITY)
        }
    }
}

impl SuspensionParameters {
    /// Builds a bundle whose masses are derived from weights (mass = weight / gravity).
    /// Damping and stiffness start at zero.
    pub fn from_weights(wheel_weight: f64, car_weight: f64, gravity: f64) -> Self {
        Self {
            wheel_mass: wheel_weight / gravity,
            car_mass: car_weight / gravity,
            shock_damping: 0.0,
            tire_damping: 0.0,
            spring_stiffness: 0.0,
            tire_stiffness: 0.0,
            gravity,
        }
    }

    pub fn validate(&self) -> SimulationResult<()> {
        require_positive("wheel_mass", self.wheel_mass)?;
        require_positive("car_mass", self.car_mass)?;
        require_non_negative("shock_damping", self.shock_damping)?;
        require_non_negative("tire_damping", self.tire_damping)?;
        require_non_negative("spring_stiffness", self.spring_stiffness)?;
        require_non_negative("tire_stiffness", self.tire_stiffness)?;
        require_positive("gravity", self.gravity)?;
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> SimulationResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::configuration(format!(
            "{name} must be positive and finite (got {value})."
        )))
    }
}

fn require_non_negative(name: &str, value: f64) -> SimulationResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::configuration(format!(
            "{name} must be non-negative and finite (got {value})."
        )))
    }
}
