use crate::error::SimulationResult;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in the integrator.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Supplies the rate of change for a single slot of a state vector.
///
/// Every provider receives the *entire* state, so coupled rates can read any
/// component. Closures of the form `Fn(&[T]) -> T` are providers.
pub trait Derivative<T: Scalar> {
    fn rate(&self, x: &[T]) -> T;
}

impl<T: Scalar, F> Derivative<T> for F
where
    F: Fn(&[T]) -> T,
{
    fn rate(&self, x: &[T]) -> T {
        self(x)
    }
}

/// Represents an autonomous first-order system dx/dt = f(x).
/// Systems that depend on time carry it as one of their state components.
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// x: current state
    /// out: buffer to write dx/dt
    fn apply(&self, x: &[T], out: &mut [T]);
}

/// A trait for solvers that can step a system forward.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt.
    /// state: current state (overwritten with the advanced state on success)
    /// dt: step size
    fn step(
        &mut self,
        system: &impl DynamicalSystem<T>,
        state: &mut [T],
        dt: T,
    ) -> SimulationResult<()>;
}
