//! Two-mass quarter-car suspension model.
//!
//! The state vector carries both displacements, both velocities and the elapsed
//! time, so the road input can be read straight from the state.

pub mod parameters;
pub mod road;

use std::sync::Arc;

use crate::derivatives::DerivativeSet;
use crate::error::SimulationResult;
use crate::traits::DynamicalSystem;
use parameters::SuspensionParameters;
use road::RoadProfile;

pub const CAR_POSITION: usize = 0;
pub const CAR_VELOCITY: usize = 1;
pub const WHEEL_POSITION: usize = 2;
pub const WHEEL_VELOCITY: usize = 3;
pub const TIME: usize = 4;
pub const STATE_DIMENSION: usize = 5;

/// Sprung mass on a spring/damper over an unsprung mass riding the road
/// through the tire's own spring/damper pair.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarterCar<R> {
    parameters: SuspensionParameters,
    road: R,
}

impl<R: RoadProfile> QuarterCar<R> {
    /// Validates the parameters and road so that no division by a non-positive
    /// mass can happen during integration.
    pub fn new(parameters: SuspensionParameters, road: R) -> SimulationResult<Self> {
        parameters.validate()?;
        road.validate()?;
        Ok(Self { parameters, road })
    }

    pub fn parameters(&self) -> &SuspensionParameters {
        &self.parameters
    }

    pub fn road(&self) -> &R {
        &self.road
    }

    pub fn car_position_rate(&self, x: &[f64]) -> f64 {
        x[CAR_VELOCITY]
    }

    /// Spring and shock force between the masses over the car mass.
    pub fn car_velocity_rate(&self, x: &[f64]) -> f64 {
        let p = &self.parameters;
        -(p.spring_stiffness * (x[CAR_POSITION] - x[WHEEL_POSITION])
            + p.shock_damping * (x[CAR_VELOCITY] - x[WHEEL_VELOCITY]))
            / p.car_mass
    }

    pub fn wheel_position_rate(&self, x: &[f64]) -> f64 {
        x[WHEEL_VELOCITY]
    }

    /// Suspension force from the car plus tire force from the road over the wheel mass.
    pub fn wheel_velocity_rate(&self, x: &[f64]) -> f64 {
        let p = &self.parameters;
        let t = x[TIME];
        let suspension = -(p.spring_stiffness * (x[WHEEL_POSITION] - x[CAR_POSITION])
            + p.shock_damping * (x[WHEEL_VELOCITY] - x[CAR_VELOCITY]));
        let tire = -p.tire_stiffness * (x[WHEEL_POSITION] - self.road.height(t))
            - p.tire_damping * (x[WHEEL_VELOCITY] - self.road.rate(t));
        (suspension + tire) / p.wheel_mass
    }

    pub fn time_rate(&self, _x: &[f64]) -> f64 {
        1.0
    }
}

impl<R> QuarterCar<R>
where
    R: RoadProfile + Clone + Send + Sync + 'static,
{
    /// The five derivative providers in state-slot order, sharing one read-only
    /// copy of the model.
    pub fn derivative_set(&self) -> DerivativeSet<f64> {
        let model = Arc::new(self.clone());
        let car_position = Arc::clone(&model);
        let car_velocity = Arc::clone(&model);
        let wheel_position = Arc::clone(&model);
        let wheel_velocity = Arc::clone(&model);

        DerivativeSet::new()
            .with(move |x: &[f64]| car_position.car_position_rate(x))
            .with(move |x: &[f64]| car_velocity.car_velocity_rate(x))
            .with(move |x: &[f64]| wheel_position.wheel_position_rate(x))
            .with(move |x: &[f64]| wheel_velocity.wheel_velocity_rate(x))
            .with(move |x: &[f64]| model.time_rate(x))
    }
}

impl<R: RoadProfile> DynamicalSystem<f64> for QuarterCar<R> {
    fn dimension(&self) -> usize {
        STATE_DIMENSION
    }

    fn apply(&self, x: &[f64], out: &mut [f64]) {
        out[CAR_POSITION] = self.car_position_rate(x);
        out[CAR_VELOCITY] = self.car_velocity_rate(x);
        out[WHEEL_POSITION] = self.wheel_position_rate(x);
        out[WHEEL_VELOCITY] = self.wheel_velocity_rate(x);
        out[TIME] = self.time_rate(x);
    }
}
