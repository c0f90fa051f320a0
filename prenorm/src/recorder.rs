//! Per-step sampling of named observables, handed out on request.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recordable {
    #[serde(rename = "V_m")]
    Vm,
    #[serde(rename = "U_m")]
    Um,
    #[serde(rename = "inc_weight_sum")]
    IncWeightSum,
}

impl Recordable {
    pub const ALL: [Recordable; 3] = [Self::Vm, Self::Um, Self::IncWeightSum];

    pub fn name(self) -> &'static str {
        match self {
            Self::Vm => "V_m",
            Self::Um => "U_m",
            Self::IncWeightSum => "inc_weight_sum",
        }
    }
}

/// Snapshot of everything recordable after one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    pub v_m: f64,
    pub u_m: f64,
    pub inc_weight_sum: f64,
}

impl Observables {
    #[inline]
    pub fn get(&self, r: Recordable) -> f64 {
        match r {
            Recordable::Vm => self.v_m,
            Recordable::Um => self.u_m,
            Recordable::IncWeightSum => self.inc_weight_sum,
        }
    }
}

/// What a recording device wants: which observables and every how many steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSpec {
    pub record_from: Vec<Recordable>,
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_interval() -> u64 {
    1
}

impl Default for RecordingSpec {
    fn default() -> Self {
        Self {
            record_from: Recordable::ALL.to_vec(),
            interval: 1,
        }
    }
}

/// Request from the recording device for all samples taken before `until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLoggingRequest {
    pub until: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub step: u64,
    /// In the order of [`RecordingSpec::record_from`].
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct DataLogger {
    spec: Option<RecordingSpec>,
    samples: Vec<Sample>,
}

impl DataLogger {
    pub fn connect(&mut self, spec: RecordingSpec) -> Result<()> {
        if spec.interval == 0 {
            return Err(Error::bad_parameter("interval", "must be at least one step"));
        }
        if spec.record_from.is_empty() {
            return Err(Error::bad_parameter("record_from", "nothing to record"));
        }
        self.spec = Some(spec);
        self.samples.clear();
        Ok(())
    }

    pub fn spec(&self) -> Option<&RecordingSpec> {
        self.spec.as_ref()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn record(&mut self, step: u64, obs: &Observables) {
        let Some(spec) = &self.spec else {
            return;
        };
        if step % spec.interval != 0 {
            return;
        }
        self.samples.push(Sample {
            step,
            values: spec.record_from.iter().map(|&r| obs.get(r)).collect(),
        });
    }

    /// Hand out every buffered sample taken before `request.until`.
    pub fn handle(&mut self, request: &DataLoggingRequest) -> Vec<Sample> {
        let split = self.samples.partition_point(|s| s.step < request.until);
        self.samples.drain(..split).collect()
    }

    pub fn pending(&self) -> usize {
        self.samples.len()
    }
}
