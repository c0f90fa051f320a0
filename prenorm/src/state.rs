use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dynamic state of the unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    /// Membrane potential (mV)
    pub v: f64,
    /// Recovery variable
    pub u: f64,
    /// Input current latched from the current delay line, applied on the next step
    pub i: f64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            v: -65.0,
            u: 0.0,
            i: 0.0,
        }
    }
}

/// Staged state assignment. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateUpdate {
    #[serde(rename = "V_m")]
    pub v_m: Option<f64>,
    #[serde(rename = "U_m")]
    pub u_m: Option<f64>,
}

impl StateUpdate {
    pub fn apply(&self, current: &State) -> Result<State> {
        let mut s = *current;
        s.v = self.v_m.unwrap_or(s.v);
        s.u = self.u_m.unwrap_or(s.u);
        if !s.v.is_finite() {
            return Err(Error::bad_state("V_m", format!("must be finite, got {}", s.v)));
        }
        if !s.u.is_finite() {
            return Err(Error::bad_state("U_m", format!("must be finite, got {}", s.u)));
        }
        Ok(s)
    }
}
