use crate::error::{SimulationError, SimulationResult};
use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic Runge-Kutta 4th Order Solver
///
/// Every stage is fully formed before the next one is evaluated, so each
/// derivative sees the same trial state as its siblings.
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![T::zero(); dim],
            k2: vec![T::zero(); dim],
            k3: vec![T::zero(); dim],
            k4: vec![T::zero(); dim],
            tmp: vec![T::zero(); dim],
        }
    }

    pub fn dimension(&self) -> usize {
        self.tmp.len()
    }

    fn resize(&mut self, dim: usize) {
        for buffer in [
            &mut self.k1,
            &mut self.k2,
            &mut self.k3,
            &mut self.k4,
            &mut self.tmp,
        ] {
            buffer.resize(dim, T::zero());
        }
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(
        &mut self,
        system: &impl DynamicalSystem<T>,
        state: &mut [T],
        dt: T,
    ) -> SimulationResult<()> {
        validate_step(system.dimension(), state.len(), dt)?;
        let n = state.len();
        if self.dimension() != n {
            self.resize(n);
        }

        let two = T::one() + T::one();
        let six = two + two + two;

        // k1 = f(x) * dt
        system.apply(state, &mut self.k1);
        scale(&mut self.k1, dt);

        // k2 = f(x + k1/2) * dt
        for i in 0..n {
            self.tmp[i] = state[i] + self.k1[i] / two;
        }
        system.apply(&self.tmp, &mut self.k2);
        scale(&mut self.k2, dt);

        // k3 = f(x + k2/2) * dt
        for i in 0..n {
            self.tmp[i] = state[i] + self.k2[i] / two;
        }
        system.apply(&self.tmp, &mut self.k3);
        scale(&mut self.k3, dt);

        // k4 = f(x + k3) * dt
        for i in 0..n {
            self.tmp[i] = state[i] + self.k3[i];
        }
        system.apply(&self.tmp, &mut self.k4);
        scale(&mut self.k4, dt);

        // x_next = x + (k1 + 2k2 + 2k3 + k4) / 6
        for i in 0..n {
            state[i] = state[i]
                + (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]) / six;
        }

        Ok(())
    }
}

/// Advances `state` by one RK4 step without touching the caller's vector.
pub fn rk4_step<T, S>(state: &[T], system: &S, step_size: T) -> SimulationResult<Vec<T>>
where
    T: Scalar,
    S: DynamicalSystem<T>,
{
    let mut next = state.to_vec();
    RK4::new(state.len()).step(system, &mut next, step_size)?;
    Ok(next)
}

fn validate_step<T: Scalar>(system_dim: usize, state_dim: usize, dt: T) -> SimulationResult<()> {
    if state_dim == 0 {
        return Err(SimulationError::configuration(
            "State vector must have at least one component.",
        ));
    }
    if system_dim != state_dim {
        return Err(SimulationError::DimensionMismatch {
            expected: state_dim,
            actual: system_dim,
        });
    }
    if !(dt.is_finite() && dt > T::zero()) {
        return Err(SimulationError::configuration(format!(
            "Step size must be positive and finite (got {dt:?})."
        )));
    }
    Ok(())
}

fn scale<T: Scalar>(values: &mut [T], factor: T) {
    for value in values.iter_mut() {
        *value = *value * factor;
    }
}

#[cfg(test)]
mod tests {
    use super::{rk4_step, RK4};
    use crate::derivatives::DerivativeSet;
    use crate::error::{SimulationError, SimulationResult};
    use crate::traits::{DynamicalSystem, Steppable};
    use std::f64::consts::PI;
    use std::sync::{Arc, Mutex};

    struct Oscillator;

    impl DynamicalSystem<f64> for Oscillator {
        fn dimension(&self) -> usize {
            2
        }

        fn apply(&self, x: &[f64], out: &mut [f64]) {
            out[0] = x[1];
            out[1] = -x[0];
        }
    }

    fn assert_err_contains<T: std::fmt::Debug>(result: SimulationResult<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    /// Distance from the analytic solution cos(t), -sin(t) after integrating to `horizon`.
    fn oscillator_error(dt: f64, horizon: f64) -> f64 {
        let steps = (horizon / dt).round() as usize;
        let mut stepper = RK4::new(2);
        let mut state = [1.0, 0.0];
        for _ in 0..steps {
            stepper.step(&Oscillator, &mut state, dt).unwrap();
        }
        let t = steps as f64 * dt;
        ((state[0] - t.cos()).powi(2) + (state[1] + t.sin()).powi(2)).sqrt()
    }

    #[test]
    fn oscillator_returns_to_start_after_one_revolution() {
        let dt = 0.001;
        let steps = (2.0 * PI / dt).round() as usize;
        let mut stepper = RK4::new(2);
        let mut state = [1.0, 0.0];
        for _ in 0..steps {
            stepper.step(&Oscillator, &mut state, dt).unwrap();
        }
        assert!((state[0] - 1.0).abs() < 1e-3);
        assert!(state[1].abs() < 1e-3);
    }

    #[test]
    fn halving_the_step_size_cuts_global_error_sixteenfold() {
        let coarse = oscillator_error(0.1, 10.0);
        let fine = oscillator_error(0.05, 10.0);
        let ratio = coarse / fine;
        assert!(
            (14.0..18.0).contains(&ratio),
            "expected fourth-order convergence, got ratio {ratio}"
        );
    }

    #[test]
    fn single_step_matches_fourth_order_taylor_polynomial() {
        let growth: DerivativeSet<f64> = DerivativeSet::new().with(|x: &[f64]| x[0]);
        let h = 0.1;
        let next = rk4_step(&[1.0], &growth, h).unwrap();
        let expected = 1.0 + h + h * h / 2.0 + h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert!((next[0] - expected).abs() < 1e-14);
    }

    #[test]
    fn every_stage_sees_one_consistent_trial_state() {
        let seen: Arc<Mutex<Vec<Vec<f64>>>> = Arc::new(Mutex::new(Vec::new()));
        let mut set: DerivativeSet<f64> = DerivativeSet::new();
        for slot in 0..3 {
            let seen = Arc::clone(&seen);
            set.push(move |x: &[f64]| {
                seen.lock().unwrap().push(x.to_vec());
                (slot as f64 + 1.0) * x[(slot + 1) % 3]
            });
        }

        rk4_step(&[1.0, 2.0, 3.0], &set, 0.1).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 12);
        assert_eq!(seen[0], vec![1.0, 2.0, 3.0]);
        for stage in seen.chunks(3) {
            assert_eq!(stage[0], stage[1]);
            assert_eq!(stage[1], stage[2]);
        }
    }

    #[test]
    fn rk4_step_leaves_the_input_untouched() {
        let state = vec![1.0, 0.0];
        let next = rk4_step(&state, &Oscillator, 0.01).unwrap();
        assert_eq!(state, vec![1.0, 0.0]);
        assert!(next[1] < 0.0);
    }

    #[test]
    fn rejects_derivative_count_mismatch() {
        let mut set: DerivativeSet<f64> = DerivativeSet::new();
        for _ in 0..4 {
            set.push(|_: &[f64]| 0.0);
        }
        let result = rk4_step(&[0.0; 5], &set, 0.001);
        assert_eq!(
            result,
            Err(SimulationError::DimensionMismatch {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn rejects_invalid_step_inputs() {
        assert_err_contains(rk4_step(&[1.0, 0.0], &Oscillator, 0.0), "Step size");
        assert_err_contains(rk4_step(&[1.0, 0.0], &Oscillator, -0.1), "Step size");
        assert_err_contains(rk4_step(&[1.0, 0.0], &Oscillator, f64::NAN), "Step size");

        let empty: DerivativeSet<f64> = DerivativeSet::new();
        let no_state: [f64; 0] = [];
        assert_err_contains(rk4_step(&no_state, &empty, 0.1), "at least one component");
    }

    #[test]
    fn stepper_adapts_its_buffers_to_the_state() {
        let mut stepper = RK4::new(0);
        let mut state = [1.0, 0.0];
        stepper.step(&Oscillator, &mut state, 0.01).unwrap();
        assert_eq!(stepper.dimension(), 2);
    }

    #[test]
    fn integrates_single_precision_scalars() {
        let decay: DerivativeSet<f32> = DerivativeSet::new().with(|x: &[f32]| -x[0]);
        let mut stepper = RK4::new(1);
        let mut state = [1.0_f32];
        for _ in 0..100 {
            stepper.step(&decay, &mut state, 0.01).unwrap();
        }
        assert!((state[0] - (-1.0_f32).exp()).abs() < 1e-4);
    }

    mod proptests {
        use super::super::RK4;
        use crate::derivatives::DerivativeSet;
        use crate::traits::Steppable;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn time_slot_advances_by_exactly_one_step_size(
                steps in 0usize..2000,
                dt in 1e-4_f64..0.1,
            ) {
                let clock: DerivativeSet<f64> = DerivativeSet::new()
                    .with(|x: &[f64]| x[1])
                    .with(|_: &[f64]| 1.0);
                let mut stepper = RK4::new(2);
                let mut state = [0.0, 0.0];
                for _ in 0..steps {
                    stepper.step(&clock, &mut state, dt).unwrap();
                }
                let expected = steps as f64 * dt;
                prop_assert!((state[1] - expected).abs() <= 1e-9 * expected.max(1.0));
            }
        }
    }
}
