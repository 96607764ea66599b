use crate::error::{SimulationError, SimulationResult};
use crate::quarter_car::parameters::SuspensionParameters;
use nalgebra::linalg::SymmetricEigen;
use nalgebra::{Matrix2, Vector2};
use serde::Serialize;
use std::f64::consts::PI;

/// Settled displacements under a constant road height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StaticResponse {
    pub car_displacement: f64,
    pub wheel_displacement: f64,
}

/// Undamped natural frequencies of the two-mass system, in rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModalResponse {
    /// Low-frequency mode dominated by the car body.
    pub body_bounce: f64,
    /// High-frequency mode dominated by the wheel on the tire.
    pub wheel_hop: f64,
}

impl ModalResponse {
    pub fn body_bounce_hz(&self) -> f64 {
        self.body_bounce / (2.0 * PI)
    }

    pub fn wheel_hop_hz(&self) -> f64 {
        self.wheel_hop / (2.0 * PI)
    }
}

fn stiffness_matrix(params: &SuspensionParameters) -> Matrix2<f64> {
    let ks = params.spring_stiffness;
    let kt = params.tire_stiffness;
    Matrix2::new(ks, -ks, -ks, ks + kt)
}

/// Solves K x = F for the equilibrium reached once the road sits at `road_height`.
pub fn static_response(
    params: &SuspensionParameters,
    road_height: f64,
) -> SimulationResult<StaticResponse> {
    params.validate()?;
    if !road_height.is_finite() {
        return Err(SimulationError::configuration(format!(
            "Road height must be finite (got {road_height})."
        )));
    }

    let load = Vector2::new(0.0, params.tire_stiffness * road_height);
    let displacement = stiffness_matrix(params)
        .lu()
        .solve(&load)
        .ok_or_else(|| {
            SimulationError::configuration(
                "Stiffness matrix is singular; spring and tire stiffness must both be positive.",
            )
        })?;

    Ok(StaticResponse {
        car_displacement: displacement[0],
        wheel_displacement: displacement[1],
    })
}

/// Solves K v = ω² M v through the symmetric form M^-1/2 K M^-1/2.
pub fn natural_frequencies(params: &SuspensionParameters) -> SimulationResult<ModalResponse> {
    params.validate()?;

    let inv_sqrt = Matrix2::from_diagonal(&Vector2::new(
        1.0 / params.car_mass.sqrt(),
        1.0 / params.wheel_mass.sqrt(),
    ));
    let symmetric = inv_sqrt * stiffness_matrix(params) * inv_sqrt;
    let eigen = SymmetricEigen::new(symmetric);

    let mut omegas = [
        eigen.eigenvalues[0].max(0.0).sqrt(),
        eigen.eigenvalues[1].max(0.0).sqrt(),
    ];
    omegas.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(ModalResponse {
        body_bounce: omegas[0],
        wheel_hop: omegas[1],
    })
}
