use crate::connection::NodeId;

/// Weighted spike arriving at the unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeEvent {
    /// Transmission delay of the connection that carried it, in steps.
    pub delay_steps: i64,
    /// Delivery step relative to the origin of the interval being filled.
    pub rel_delivery: u64,
    pub weight: f64,
    pub multiplicity: u32,
}

impl SpikeEvent {
    pub fn new(rel_delivery: u64, weight: f64) -> Self {
        Self {
            delay_steps: 1,
            rel_delivery,
            weight,
            multiplicity: 1,
        }
    }
}

/// Step current arriving at the unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentEvent {
    pub delay_steps: i64,
    pub rel_delivery: u64,
    pub amplitude: f64,
    pub weight: f64,
}

impl CurrentEvent {
    pub fn new(rel_delivery: u64, amplitude: f64) -> Self {
        Self {
            delay_steps: 1,
            rel_delivery,
            amplitude,
            weight: 1.0,
        }
    }
}

/// One outward spike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    pub sender: NodeId,
    /// Offset within the delivery interval at which the crossing happened.
    pub lag: u64,
    /// Spike time in steps, `origin + lag + 1`.
    pub stamp: u64,
}

/// Outward event delivery.
pub trait SpikeSink {
    fn send(&mut self, emission: Emission);
}

impl SpikeSink for Vec<Emission> {
    fn send(&mut self, emission: Emission) {
        self.push(emission);
    }
}
