//! Numerical steppers for scalar ODEs `dx/dt = f(x)`.
//!
//! Inputs are held constant across one step; the dynamics only see the
//! state.

pub trait Stepper {
    /// Advance `x` by `dt` under `f`.
    fn advance<F: Fn(f32) -> f32>(&self, x: f32, dt: f32, f: F) -> f32;
}

/// Forward (explicit) Euler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl Stepper for Euler {
    #[inline]
    fn advance<F: Fn(f32) -> f32>(&self, x: f32, dt: f32, f: F) -> f32 {
        x + dt * f(x)
    }
}

/// Classical fourth-order Runge-Kutta.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4;

impl Stepper for Rk4 {
    fn advance<F: Fn(f32) -> f32>(&self, x: f32, dt: f32, f: F) -> f32 {
        let k1 = f(x);
        let k2 = f(x + 0.5 * dt * k1);
        let k3 = f(x + 0.5 * dt * k2);
        let k4 = f(x + dt * k3);
        x + dt / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // dx/dt = -x, x(0) = 1  =>  x(1) = e^-1
    fn decay_to_one<S: Stepper>(s: &S, steps: usize) -> f32 {
        let dt = 1.0 / steps as f32;
        let mut x = 1.0;
        for _ in 0..steps {
            x = s.advance(x, dt, |x| -x);
        }
        x
    }

    #[test]
    fn euler_converges_to_exponential() {
        let exact = (-1.0f32).exp();
        let x = decay_to_one(&Euler, 1000);
        assert!((x - exact).abs() < 1e-3, "{x} vs {exact}");
    }

    #[test]
    fn rk4_is_much_more_accurate_than_euler() {
        let exact = (-1.0f32).exp();
        let e = (decay_to_one(&Euler, 10) - exact).abs();
        let r = (decay_to_one(&Rk4, 10) - exact).abs();
        assert!(r < 1e-5, "rk4 error {r}");
        assert!(r < e / 100.0);
    }
}
