//! Model parameters and their staged update.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::scheme::Integration;
use crate::time::{KernelContext, Resolution};

const DEFAULT_NORM_PERIOD_MS: f64 = 100.0;

/// Independent parameters of the unit. Replaced as a whole, never field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// Time scale of the recovery variable
    pub a: f64,
    /// Sensitivity of the recovery variable to `v`
    pub b: f64,
    /// After-spike reset value of `v`
    pub c: f64,
    /// After-spike increment of `u`
    pub d: f64,
    /// Constant external current (pA)
    pub i_e: f64,
    /// Spike threshold (mV)
    pub v_th: f64,
    /// Lower bound of `v` (mV)
    pub v_min: f64,
    /// Normalization period in steps
    pub norm_period: u64,
    /// Target sum of incoming weights
    pub norm_value: f64,
    pub integration: Integration,
    /// Time constant of the post-synaptic spike trace (ms)
    pub tau_minus: f64,
}

impl Parameters {
    pub fn new(resolution: &Resolution) -> Self {
        Self {
            a: 0.02,
            b: 0.2,
            c: -65.0,
            d: 8.0,
            i_e: 0.0,
            v_th: 30.0,
            v_min: -f64::MAX,
            norm_period: resolution.ms_to_steps(DEFAULT_NORM_PERIOD_MS).max(1) as u64,
            norm_value: 30.0,
            integration: Integration::Consistent,
            tau_minus: 20.0,
        }
    }

    /// Check a complete candidate against the kernel it will run in.
    pub fn validate(&self, ctx: &KernelContext) -> Result<()> {
        for (name, value) in [
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
            ("d", self.d),
            ("I_e", self.i_e),
            ("V_th", self.v_th),
            ("norm_value", self.norm_value),
        ] {
            if !value.is_finite() {
                return Err(Error::bad_parameter(name, format!("must be finite, got {value}")));
            }
        }
        if self.v_min.is_nan() || self.v_min == f64::INFINITY {
            return Err(Error::bad_parameter(
                "V_min",
                format!("must be a number below +inf, got {}", self.v_min),
            ));
        }
        if self.norm_period < ctx.min_delay {
            return Err(Error::bad_parameter(
                "norm_period",
                format!(
                    "must be at least equal to the smallest delay in the network ({} steps), got {} steps",
                    ctx.min_delay, self.norm_period
                ),
            ));
        }
        if !(self.tau_minus.is_finite() && self.tau_minus > 0.0) {
            return Err(Error::bad_parameter(
                "tau_minus",
                format!("must be positive, got {}", self.tau_minus),
            ));
        }
        Ok(())
    }

    pub fn status(&self, resolution: &Resolution) -> ParameterStatus {
        ParameterStatus {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
            i_e: self.i_e,
            v_th: self.v_th,
            v_min: self.v_min,
            norm_period: resolution.steps_to_ms(self.norm_period as i64),
            norm_value: self.norm_value,
            consistent_integration: self.integration == Integration::Consistent,
            tau_minus: self.tau_minus,
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new(&Resolution::default())
    }
}

/// External view of [`Parameters`]; the normalization period is in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterStatus {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    #[serde(rename = "I_e")]
    pub i_e: f64,
    #[serde(rename = "V_th")]
    pub v_th: f64,
    #[serde(rename = "V_min")]
    pub v_min: f64,
    pub norm_period: f64,
    pub norm_value: f64,
    pub consistent_integration: bool,
    pub tau_minus: f64,
}

/// Staged parameter change. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterUpdate {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub c: Option<f64>,
    pub d: Option<f64>,
    #[serde(rename = "I_e")]
    pub i_e: Option<f64>,
    #[serde(rename = "V_th")]
    pub v_th: Option<f64>,
    #[serde(rename = "V_min")]
    pub v_min: Option<f64>,
    /// Milliseconds
    pub norm_period: Option<f64>,
    pub norm_value: Option<f64>,
    pub consistent_integration: Option<bool>,
    pub tau_minus: Option<f64>,
}

impl ParameterUpdate {
    /// Build the candidate that results from applying this update to `current`.
    /// `current` is left untouched; the candidate is returned only if valid.
    pub fn apply(&self, current: &Parameters, ctx: &KernelContext) -> Result<Parameters> {
        let mut p = current.clone();
        p.a = self.a.unwrap_or(p.a);
        p.b = self.b.unwrap_or(p.b);
        p.c = self.c.unwrap_or(p.c);
        p.d = self.d.unwrap_or(p.d);
        p.i_e = self.i_e.unwrap_or(p.i_e);
        p.v_th = self.v_th.unwrap_or(p.v_th);
        p.v_min = self.v_min.unwrap_or(p.v_min);
        p.norm_value = self.norm_value.unwrap_or(p.norm_value);
        p.tau_minus = self.tau_minus.unwrap_or(p.tau_minus);
        if let Some(consistent) = self.consistent_integration {
            p.integration = Integration::from_consistent(consistent);
        }
        if let Some(ms) = self.norm_period {
            if !ms.is_finite() {
                return Err(Error::bad_parameter(
                    "norm_period",
                    format!("must be finite, got {ms}"),
                ));
            }
            let steps = ctx.resolution.ms_to_steps(ms);
            if steps < 1 {
                return Err(Error::bad_parameter(
                    "norm_period",
                    format!("must be at least one step, got {ms} ms"),
                ));
            }
            p.norm_period = steps as u64;
        }
        p.validate(ctx)?;

        if p.integration == Integration::Published && ctx.resolution.ms() != 1.0 {
            info!(
                resolution_ms = ctx.resolution.ms(),
                "published-form integration expects a resolution of 1.0 ms"
            );
        }
        Ok(p)
    }
}
