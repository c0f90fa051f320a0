//! Simulation resolution and the kernel services a unit needs during an update.
//!
//! Everything inside the crate counts in discrete steps. Milliseconds only
//! appear at the configuration boundary, converted through [`Resolution`].

use crate::error::{Error, Result};

/// Fixed integration step size `h`, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    h_ms: f64,
}

impl Resolution {
    pub fn new(h_ms: f64) -> Result<Self> {
        if !h_ms.is_finite() || h_ms <= 0.0 {
            return Err(Error::bad_parameter(
                "resolution",
                format!("must be a positive number of milliseconds, got {h_ms}"),
            ));
        }
        Ok(Self { h_ms })
    }

    #[inline]
    pub fn ms(&self) -> f64 {
        self.h_ms
    }

    /// Round a duration in milliseconds to the nearest whole number of steps.
    pub fn ms_to_steps(&self, ms: f64) -> i64 {
        (ms / self.h_ms).round() as i64
    }

    pub fn steps_to_ms(&self, steps: i64) -> f64 {
        steps as f64 * self.h_ms
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self { h_ms: 0.1 }
    }
}

/// Injected replacement for the global scheduler: resolution plus the delay
/// bounds of the network the unit lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelContext {
    pub resolution: Resolution,
    /// Smallest connection delay in the network, in steps. Also the length of
    /// one delivery interval.
    pub min_delay: u64,
    /// Largest connection delay in the network, in steps.
    pub max_delay: u64,
}

impl KernelContext {
    pub fn new(h_ms: f64, min_delay_ms: f64, max_delay_ms: f64) -> Result<Self> {
        let resolution = Resolution::new(h_ms)?;
        let min_delay = resolution.ms_to_steps(min_delay_ms);
        let max_delay = resolution.ms_to_steps(max_delay_ms);
        Self::from_steps(resolution, min_delay, max_delay)
    }

    pub fn from_steps(resolution: Resolution, min_delay: i64, max_delay: i64) -> Result<Self> {
        if min_delay < 1 {
            return Err(Error::bad_parameter(
                "min_delay",
                format!("must be at least one step, got {min_delay}"),
            ));
        }
        if max_delay < min_delay {
            return Err(Error::bad_parameter(
                "max_delay",
                format!("must not be smaller than min_delay ({min_delay}), got {max_delay}"),
            ));
        }
        Ok(Self {
            resolution,
            min_delay: min_delay as u64,
            max_delay: max_delay as u64,
        })
    }

    /// Number of slots a delay line needs so that no pending contribution is
    /// overwritten before it is consumed.
    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        (self.min_delay + self.max_delay) as usize
    }
}

impl Default for KernelContext {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            min_delay: 1,
            max_delay: 1,
        }
    }
}
