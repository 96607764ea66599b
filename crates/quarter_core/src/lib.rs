pub mod analysis;
pub mod derivatives;
pub mod error;
pub mod quarter_car;
pub mod simulation;
pub mod solvers;
/// The `quarter_core` crate provides the numerical engine for quarter-car suspension studies.
/// The integrator is generic over the scalar type and knows nothing about the vehicle;
/// the vehicle model plugs into it through the shared derivative contract.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `Derivative` (per-slot rate providers),
///   `DynamicalSystem` (autonomous ODEs), `Steppable` (solvers).
/// - **Solvers**: the classical fixed-step RK4 integrator.
/// - **Quarter car**: suspension parameters, road profiles and the five state derivatives.
/// - **Simulation**: validated run configuration and the driver producing a `Trajectory`.
/// - **Analysis**: static deflection and undamped natural frequencies of the two-mass system.
pub mod traits;

pub use error::{SimulationError, SimulationResult};
pub use quarter_car::parameters::SuspensionParameters;
pub use quarter_car::road::{FlatRoad, RoadProfile, StepRoad};
pub use quarter_car::QuarterCar;
pub use simulation::{PartialRun, Simulation, SimulationConfig, Trajectory};
