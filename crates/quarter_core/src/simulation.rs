//! Fixed-iteration driver for the quarter-car model.

use crate::error::{SimulationError, SimulationResult};
use crate::quarter_car::parameters::SuspensionParameters;
use crate::quarter_car::road::{RoadProfile, StepRoad};
use crate::quarter_car::{QuarterCar, CAR_POSITION, STATE_DIMENSION, TIME, WHEEL_POSITION};
use crate::solvers::RK4;
use crate::traits::Steppable;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Everything needed to start a run. Missing fields take the reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: Deserialize<'de> + Default"))]
pub struct SimulationConfig<R = StepRoad> {
    pub parameters: SuspensionParameters,
    pub road: R,
    pub step_size: f64,
    pub iterations: usize,
    pub initial_state: [f64; STATE_DIMENSION],
}

impl<R: Default> Default for SimulationConfig<R> {
    fn default() -> Self {
        Self {
            parameters: SuspensionParameters::default(),
            road: R::default(),
            step_size: 0.001,
            iterations: 5000,
            initial_state: [0.0; STATE_DIMENSION],
        }
    }
}

/// Upper bound on samples reserved before the first step; longer runs grow as they go.
const MAX_RESERVED_SAMPLES: usize = 1 << 16;

/// Sampled response of a run: one entry per completed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    time: Vec<f64>,
    car_displacement: Vec<f64>,
    wheel_displacement: Vec<f64>,
    final_state: Vec<f64>,
    parameters: SuspensionParameters,
}

impl Trajectory {
    fn new(initial_state: &[f64], capacity: usize, parameters: SuspensionParameters) -> Self {
        let capacity = capacity.min(MAX_RESERVED_SAMPLES);
        Self {
            time: Vec::with_capacity(capacity),
            car_displacement: Vec::with_capacity(capacity),
            wheel_displacement: Vec::with_capacity(capacity),
            final_state: initial_state.to_vec(),
            parameters,
        }
    }

    fn record(&mut self, state: &[f64]) {
        self.time.push(state[TIME]);
        self.car_displacement.push(state[CAR_POSITION]);
        self.wheel_displacement.push(state[WHEEL_POSITION]);
        self.final_state.copy_from_slice(state);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn car_displacement(&self) -> &[f64] {
        &self.car_displacement
    }

    pub fn wheel_displacement(&self) -> &[f64] {
        &self.wheel_displacement
    }

    /// Full state after the last recorded step (the initial state if none were recorded).
    pub fn final_state(&self) -> &[f64] {
        &self.final_state
    }

    pub fn parameters(&self) -> &SuspensionParameters {
        &self.parameters
    }

    /// Iterates `(time, car, wheel)` samples in order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.time
            .iter()
            .zip(&self.car_displacement)
            .zip(&self.wheel_displacement)
            .map(|((&t, &car), &wheel)| (t, car, wheel))
    }

    /// Mean car displacement over the last `window` samples.
    pub fn settled_car_displacement(&self, window: usize) -> Option<f64> {
        if window == 0 || window > self.len() {
            return None;
        }
        let tail = &self.car_displacement[self.len() - window..];
        Some(tail.iter().sum::<f64>() / window as f64)
    }
}

/// A run that stopped early. Holds every sample recorded before the failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("simulation halted after {} samples", .trajectory.len())]
pub struct PartialRun {
    pub trajectory: Trajectory,
    #[source]
    pub error: SimulationError,
}

/// Validated quarter-car run.
#[derive(Debug, Clone)]
pub struct Simulation<R = StepRoad> {
    model: QuarterCar<R>,
    step_size: f64,
    iterations: usize,
    initial_state: [f64; STATE_DIMENSION],
}

impl<R: RoadProfile> Simulation<R> {
    pub fn new(config: SimulationConfig<R>) -> SimulationResult<Self> {
        let SimulationConfig {
            parameters,
            road,
            step_size,
            iterations,
            initial_state,
        } = config;

        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(SimulationError::configuration(format!(
                "Step size must be positive and finite (got {step_size})."
            )));
        }
        if iterations == 0 {
            return Err(SimulationError::configuration(
                "Simulation requires at least one iteration.",
            ));
        }
        if let Some(value) = initial_state.iter().find(|v| !v.is_finite()) {
            return Err(SimulationError::configuration(format!(
                "Initial state must be finite (got {value})."
            )));
        }

        let model = QuarterCar::new(parameters, road)?;
        Ok(Self {
            model,
            step_size,
            iterations,
            initial_state,
        })
    }

    pub fn model(&self) -> &QuarterCar<R> {
        &self.model
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl<R> Simulation<R>
where
    R: RoadProfile + Clone + Send + Sync + 'static,
{
    /// Steps the model exactly `iterations` times, recording one sample per step.
    ///
    /// Stops at the first step that leaves a non-finite value in the state; that
    /// step is not recorded.
    pub fn run(&self) -> Result<Trajectory, PartialRun> {
        let derivatives = self.model.derivative_set();
        let mut stepper = RK4::new(STATE_DIMENSION);
        let mut state = self.initial_state.to_vec();
        let mut trajectory =
            Trajectory::new(&state, self.iterations, *self.model.parameters());
        let road = self.model.road();
        let mut surface = road.height(state[TIME]);

        info!(
            step_size = self.step_size,
            iterations = self.iterations,
            "starting quarter-car simulation"
        );

        for step in 0..self.iterations {
            if let Err(error) = stepper.step(&derivatives, &mut state, self.step_size) {
                return Err(PartialRun { trajectory, error });
            }

            if let Some((slot, &value)) = state.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                warn!(step, slot, value, "state diverged; halting simulation");
                return Err(PartialRun {
                    trajectory,
                    error: SimulationError::NumericalDivergence { step, slot, value },
                });
            }

            let height = road.height(state[TIME]);
            if height != surface {
                debug!(time = state[TIME], height, "road surface changed");
                surface = height;
            }

            trajectory.record(&state);
        }

        info!(samples = trajectory.len(), "simulation finished");
        Ok(trajectory)
    }
}
