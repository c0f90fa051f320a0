//! The two numeric schemes for one step of the Izhikevich dynamics.
//!
//! ```text
//! dv/dt = 0.04 v^2 + 5 v + 140 - u + I
//! du/dt = a (b v - u)
//! ```

use crate::params::Parameters;
use crate::state::State;

/// Advances `(v, u)` by one step of size `h` given this step's delayed spike input.
pub type StepFn = fn(&Parameters, &mut State, f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integration {
    /// Standard forward Euler; both derivatives use the values at the start of the step.
    #[default]
    Consistent,
    /// Form used in Izhikevich (2003): two half steps for `v`, then `u` from the new `v`.
    /// Only for reproducing results computed with it.
    Published,
}

impl Integration {
    pub fn from_consistent(consistent: bool) -> Self {
        if consistent {
            Self::Consistent
        } else {
            Self::Published
        }
    }

    /// Resolve the scheme once, outside the step loop.
    pub fn stepper(self) -> StepFn {
        match self {
            Self::Consistent => consistent_step,
            Self::Published => published_step,
        }
    }
}

#[inline]
fn dv(p: &Parameters, v: f64, u: f64, i: f64) -> f64 {
    0.04 * v * v + 5.0 * v + 140.0 - u + i + p.i_e
}

pub fn consistent_step(p: &Parameters, s: &mut State, h: f64, spike_input: f64) {
    let v_old = s.v;
    let u_old = s.u;
    s.v += h * dv(p, v_old, u_old, s.i) + spike_input;
    s.u += h * p.a * (p.b * v_old - u_old);
}

/// The spike input sits inside both half-step expressions, so it enters scaled by `h`.
pub fn published_step(p: &Parameters, s: &mut State, h: f64, spike_input: f64) {
    s.v += h * 0.5 * (dv(p, s.v, s.u, s.i) + spike_input);
    s.v += h * 0.5 * (dv(p, s.v, s.u, s.i) + spike_input);
    s.u += h * p.a * (p.b * s.v - s.u);
}
