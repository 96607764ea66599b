use crate::traits::{Derivative, DynamicalSystem, Scalar};

type BoxedDerivative<T> = Box<dyn Derivative<T> + Send + Sync>;

/// An ordered set of derivative providers.
/// Provider `i` yields the rate of change of state slot `i`, so the set's length
/// is the dimension of the system it describes.
pub struct DerivativeSet<T: Scalar> {
    derivatives: Vec<BoxedDerivative<T>>,
}

impl<T: Scalar> DerivativeSet<T> {
    pub fn new() -> Self {
        Self {
            derivatives: Vec::new(),
        }
    }

    /// Appends a provider for the next slot and returns the set.
    pub fn with(mut self, derivative: impl Derivative<T> + Send + Sync + 'static) -> Self {
        self.push(derivative);
        self
    }

    pub fn push(&mut self, derivative: impl Derivative<T> + Send + Sync + 'static) {
        self.derivatives.push(Box::new(derivative));
    }

    pub fn len(&self) -> usize {
        self.derivatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.derivatives.is_empty()
    }

    /// Evaluates the provider for `slot`, or `None` if the set has no such slot.
    pub fn rate(&self, slot: usize, x: &[T]) -> Option<T> {
        self.derivatives.get(slot).map(|derivative| derivative.rate(x))
    }
}

impl<T: Scalar> Default for DerivativeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> std::fmt::Debug for DerivativeSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivativeSet")
            .field("len", &self.derivatives.len())
            .finish()
    }
}

impl<T: Scalar> DynamicalSystem<T> for DerivativeSet<T> {
    fn dimension(&self) -> usize {
        self.derivatives.len()
    }

    fn apply(&self, x: &[T], out: &mut [T]) {
        for (slot, derivative) in out.iter_mut().zip(&self.derivatives) {
            *slot = derivative.rate(x);
        }
    }
}
