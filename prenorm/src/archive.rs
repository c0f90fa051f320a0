//! Spike history kept for spike-timing-dependent connections that target the unit.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    /// Spike time (ms)
    pub t: f64,
    /// Post-synaptic trace right after this spike
    pub k_minus: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpikeArchive {
    tau_minus: f64,
    k_minus: f64,
    last_spike: Option<f64>,
    history: VecDeque<HistoryEntry>,
}

impl SpikeArchive {
    pub fn new(tau_minus: f64) -> Self {
        Self {
            tau_minus,
            k_minus: 0.0,
            last_spike: None,
            history: VecDeque::new(),
        }
    }

    pub fn set_tau_minus(&mut self, tau_minus: f64) {
        self.tau_minus = tau_minus;
    }

    pub fn last_spike(&self) -> Option<f64> {
        self.last_spike
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Record a spike at `t` ms. Times must be non-decreasing.
    pub fn record(&mut self, t: f64) {
        self.k_minus = match self.last_spike {
            Some(last) => self.k_minus * ((last - t) / self.tau_minus).exp() + 1.0,
            None => 1.0,
        };
        self.last_spike = Some(t);
        self.history.push_back(HistoryEntry {
            t,
            k_minus: self.k_minus,
        });
    }

    /// Value of the trace at `t`, from the most recent spike strictly before `t`.
    pub fn k_value(&self, t: f64) -> f64 {
        self.history
            .iter()
            .rev()
            .find(|e| e.t < t)
            .map(|e| e.k_minus * ((e.t - t) / self.tau_minus).exp())
            .unwrap_or(0.0)
    }

    /// Spikes in `(t1, t2]`.
    pub fn history(&self, t1: f64, t2: f64) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().filter(move |e| e.t > t1 && e.t <= t2)
    }

    /// Drop entries older than `horizon`, always keeping the most recent one so
    /// the trace stays defined.
    pub fn prune_before(&mut self, horizon: f64) {
        while self.history.len() > 1 && self.history.front().is_some_and(|e| e.t < horizon) {
            self.history.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.k_minus = 0.0;
        self.last_spike = None;
        self.history.clear();
    }
}
