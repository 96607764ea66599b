//! Road-surface forcing functions.

use crate::error::{SimulationError, SimulationResult};
use serde::{Deserialize, Serialize};

/// External road input driving the wheel through the tire.
pub trait RoadProfile {
    /// Surface displacement at elapsed time `t`.
    fn height(&self, t: f64) -> f64;

    /// Time derivative of the surface displacement at `t`.
    fn rate(&self, t: f64) -> f64;

    /// Checks the profile's parameters before a simulation uses it.
    fn validate(&self) -> SimulationResult<()> {
        Ok(())
    }
}

/// A single step in the road met at constant speed.
///
/// The surface is flat until the travelled distance `speed * t` reaches
/// `step_distance`, then sits at `step_height`. The rate approximates an impulse
/// with `impulse_rate` while `impulse_lower < speed * t < impulse_upper`.
///
/// The default window bounds (lower 9, upper 7) describe an empty window, so the
/// rate is zero everywhere unless the bounds are reconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepRoad {
    pub speed: f64,
    pub step_distance: f64,
    pub step_height: f64,
    pub impulse_lower: f64,
    pub impulse_upper: f64,
    pub impulse_rate: f64,
}

impl Default for StepRoad {
    fn default() -> Self {
        Self {
            speed: 80.0,
            step_distance: 8.0,
            step_height: 4.0,
            impulse_lower: 9.0,
            impulse_upper: 7.0,
            impulse_rate: 4.0,
        }
    }
}

impl StepRoad {
    /// Elapsed time at which the wheel reaches the step.
    pub fn step_time(&self) -> f64 {
        self.step_distance / self.speed
    }

    pub fn impulse_window_is_empty(&self) -> bool {
        self.impulse_lower >= self.impulse_upper
    }
}

impl RoadProfile for StepRoad {
    fn height(&self, t: f64) -> f64 {
        if self.speed * t < self.step_distance {
            0.0
        } else {
            self.step_height
        }
    }

    fn rate(&self, t: f64) -> f64 {
        let travelled = self.speed * t;
        if travelled < self.impulse_upper && travelled > self.impulse_lower {
            self.impulse_rate
        } else {
            0.0
        }
    }

    fn validate(&self) -> SimulationResult<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(SimulationError::configuration(format!(
                "Road parameter speed must be positive and finite (got {}).",
                self.speed
            )));
        }
        let fields = [
            ("step_distance", self.step_distance),
            ("step_height", self.step_height),
            ("impulse_lower", self.impulse_lower),
            ("impulse_upper", self.impulse_upper),
            ("impulse_rate", self.impulse_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SimulationError::configuration(format!(
                    "Road parameter {name} must be finite (got {value})."
                )));
            }
        }
        Ok(())
    }
}

/// A perfectly level road: no forcing at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRoad;

impl RoadProfile for FlatRoad {
    fn height(&self, _t: f64) -> f64 {
        0.0
    }

    fn rate(&self, _t: f64) -> f64 {
        0.0
    }
}
