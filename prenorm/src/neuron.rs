//! Izhikevich unit that periodically normalizes the weights of its incoming connections.
//!
//! Dynamics per step (no refractory period):
//!
//! ```text
//! v <- v + h (0.04 v^2 + 5 v + 140 - u + I + I_e) + spikes
//! u <- u + h a (b v - u)
//! v <- max(v, V_min)
//! if v >= V_th: v <- c, u <- u + d, emit spike
//! ```
//!
//! Every `norm_period` steps the unit rescales the weights of all connections
//! that target it so that they sum to `norm_value`. The unit is the only writer
//! of those weights; it reaches them through the handles in its back-reference
//! set and never owns the connections.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::archive::SpikeArchive;
use crate::connection::{BackRefs, ConnectionId, ConnectionTable, NodeId};
use crate::error::{Error, Result};
use crate::event::{CurrentEvent, Emission, SpikeEvent, SpikeSink};
use crate::params::{ParameterStatus, ParameterUpdate, Parameters};
use crate::recorder::{DataLogger, DataLoggingRequest, Observables, Recordable, RecordingSpec, Sample};
use crate::ring_buffer::RingBuffer;
use crate::state::{State, StateUpdate};
use crate::time::KernelContext;

/// Archived spikes older than `max_delay` plus this many `tau_minus` are dropped.
const ARCHIVE_TAU_SPAN: f64 = 5.0;

/// Full externally visible status of a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    #[serde(flatten)]
    pub params: ParameterStatus,
    #[serde(rename = "V_m")]
    pub v_m: f64,
    #[serde(rename = "U_m")]
    pub u_m: f64,
    pub inc_weight_sum: f64,
    /// Time of the last spike in ms, -1 if the unit never spiked.
    pub t_spike: f64,
}

#[derive(Debug, Clone)]
pub struct IzhikevichPrenorm {
    id: NodeId,
    params: Parameters,
    state: State,

    // ----------------------- Buffers
    /// Summed spike weights per future step
    spikes: RingBuffer,
    /// Summed input currents per future step
    currents: RingBuffer,
    logger: DataLogger,
    archive: SpikeArchive,

    // ----------------------- Topology
    incoming: BackRefs,
    calibrated: bool,
}

impl IzhikevichPrenorm {
    pub fn new(id: NodeId, ctx: &KernelContext) -> Self {
        let params = Parameters::new(&ctx.resolution);
        let archive = SpikeArchive::new(params.tau_minus);
        Self {
            id,
            params,
            state: State::default(),
            spikes: RingBuffer::new(ctx.buffer_capacity()),
            currents: RingBuffer::new(ctx.buffer_capacity()),
            logger: DataLogger::default(),
            archive,
            incoming: BackRefs::default(),
            calibrated: false,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn archive(&self) -> &SpikeArchive {
        &self.archive
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    // ----------------------- Configuration surface

    /// Validate the whole candidate first; on error nothing changes.
    pub fn set_params(&mut self, update: &ParameterUpdate, ctx: &KernelContext) -> Result<()> {
        let candidate = update.apply(&self.params, ctx)?;
        self.archive.set_tau_minus(candidate.tau_minus);
        self.params = candidate;
        self.calibrated = false;
        Ok(())
    }

    pub fn set_state(&mut self, update: &StateUpdate) -> Result<()> {
        self.state = update.apply(&self.state)?;
        Ok(())
    }

    pub fn status(&self, conns: &impl ConnectionTable, ctx: &KernelContext) -> Status {
        Status {
            params: self.params.status(&ctx.resolution),
            v_m: self.state.v,
            u_m: self.state.u,
            inc_weight_sum: self.inc_weight_sum(conns),
            t_spike: self.archive.last_spike().unwrap_or(-1.0),
        }
    }

    /// Connection set-up check: only the default receptor exists.
    pub fn accepts_receptor(&self, receptor: u32) -> Result<u32> {
        if receptor != 0 {
            return Err(Error::UnknownReceptorType(receptor));
        }
        Ok(0)
    }

    // ----------------------- Back references

    pub fn register_incoming(&mut self, id: ConnectionId) -> bool {
        self.calibrated = false;
        self.incoming.insert(id)
    }

    pub fn unregister_incoming(&mut self, id: ConnectionId) -> bool {
        self.calibrated = false;
        self.incoming.remove(id)
    }

    pub fn incoming(&self) -> &BackRefs {
        &self.incoming
    }

    /// Sum of the current weights of all incoming connections.
    pub fn inc_weight_sum(&self, conns: &impl ConnectionTable) -> f64 {
        self.incoming.iter().filter_map(|id| conns.weight(id)).sum()
    }

    // ----------------------- Initialization

    pub fn init_state(&mut self, prototype: &IzhikevichPrenorm) {
        self.state = prototype.state;
    }

    pub fn init_buffers(&mut self, ctx: &KernelContext) {
        self.spikes.resize(ctx.buffer_capacity());
        self.currents.resize(ctx.buffer_capacity());
        self.logger.reset();
        self.archive.clear();
    }

    /// Check that every back reference points at a connection targeting this
    /// unit and size the buffers for `ctx`. Must succeed before [`Self::update`].
    pub fn calibrate(&mut self, conns: &impl ConnectionTable, ctx: &KernelContext) -> Result<()> {
        self.calibrated = false;
        for connection in self.incoming.iter() {
            let found = conns.target(connection).ok_or(Error::MissingIncomingConnection {
                node: self.id,
                connection,
            })?;
            if found != self.id {
                return Err(Error::InvalidIncomingConnection {
                    connection,
                    expected: self.id,
                    found,
                });
            }
        }
        if self.spikes.capacity() != ctx.buffer_capacity() {
            self.spikes.resize(ctx.buffer_capacity());
            self.currents.resize(ctx.buffer_capacity());
        }
        self.params.validate(ctx)?;
        self.calibrated = true;
        info!(
            node = %self.id,
            incoming = self.incoming.len(),
            norm_period = self.params.norm_period,
            "calibrated"
        );
        Ok(())
    }

    // ----------------------- Event handlers

    pub fn handle_spike(&mut self, e: &SpikeEvent) -> Result<()> {
        if e.delay_steps <= 0 {
            return Err(Error::NonPositiveDelay(e.delay_steps));
        }
        self.spikes
            .add_value(e.rel_delivery, e.weight * e.multiplicity as f64)
    }

    pub fn handle_current(&mut self, e: &CurrentEvent) -> Result<()> {
        if e.delay_steps <= 0 {
            return Err(Error::NonPositiveDelay(e.delay_steps));
        }
        self.currents.add_value(e.rel_delivery, e.weight * e.amplitude)
    }

    pub fn connect_recorder(&mut self, spec: RecordingSpec) -> Result<()> {
        self.logger.connect(spec)
    }

    pub fn handle_logging_request(&mut self, request: &DataLoggingRequest) -> Vec<Sample> {
        self.logger.handle(request)
    }

    // ----------------------- Dynamics

    /// Move the delay lines to the interval starting at `origin`. Events handled
    /// afterwards are relative to it.
    pub fn begin_interval(&mut self, origin: u64) {
        self.spikes.set_origin(origin);
        self.currents.set_origin(origin);
    }

    /// Rescale all incoming weights so they sum to `norm_value`.
    pub fn normalize_incoming(&mut self, conns: &mut impl ConnectionTable, step: u64) -> Result<()> {
        if self.incoming.is_empty() {
            return Ok(());
        }
        // resolve everything before the first write
        let weights = self
            .incoming
            .iter()
            .map(|id| {
                conns.weight(id).map(|w| (id, w)).ok_or(Error::MissingIncomingConnection {
                    node: self.id,
                    connection: id,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let sum: f64 = weights.iter().map(|&(_, w)| w).sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(Error::DegenerateWeightSum {
                node: self.id,
                step,
                sum,
            });
        }
        let scale = self.params.norm_value / sum;
        for (id, w) in weights {
            conns.set_weight(id, w * scale);
        }
        debug!(node = %self.id, step, sum, target = self.params.norm_value, "normalized incoming weights");
        Ok(())
    }

    /// Advance the unit over lags `[from, to)` of the interval starting at `origin`.
    pub fn update(
        &mut self,
        origin: u64,
        from: u64,
        to: u64,
        ctx: &KernelContext,
        conns: &mut impl ConnectionTable,
        sink: &mut impl SpikeSink,
    ) -> Result<()> {
        if from >= to || to > ctx.min_delay {
            return Err(Error::InvalidStepRange {
                from,
                to,
                min_delay: ctx.min_delay,
            });
        }
        if !self.calibrated {
            return Err(Error::NotCalibrated(self.id));
        }
        self.begin_interval(origin);

        let h = ctx.resolution.ms();
        let step_fn = self.params.integration.stepper();
        let records_weight_sum = self
            .logger
            .spec()
            .is_some_and(|s| s.record_from.contains(&Recordable::IncWeightSum));

        for lag in from..to {
            let p = &self.params;
            let s = &mut self.state;
            step_fn(p, s, h, self.spikes.get_value(lag));

            if s.v < p.v_min {
                s.v = p.v_min;
            }

            if s.v >= p.v_th {
                s.v = p.c;
                s.u += p.d;

                let stamp = origin + lag + 1;
                self.archive.record(ctx.resolution.steps_to_ms(stamp as i64));
                trace!(node = %self.id, stamp, "spike");
                sink.send(Emission {
                    sender: self.id,
                    lag,
                    stamp,
                });
            }

            // forcing for the next step
            s.i = self.currents.get_value(lag);

            let step = origin + lag;
            if step % p.norm_period == 0 {
                self.normalize_incoming(&mut *conns, step)?;
            }

            let obs = Observables {
                v_m: self.state.v,
                u_m: self.state.u,
                inc_weight_sum: if records_weight_sum {
                    self.inc_weight_sum(&*conns)
                } else {
                    0.0
                },
            };
            self.logger.record(step, &obs);
        }

        let now = ctx.resolution.steps_to_ms((origin + to) as i64);
        let reach = ctx.resolution.steps_to_ms(ctx.max_delay as i64)
            + ARCHIVE_TAU_SPAN * self.params.tau_minus;
        self.archive.prune_before(now - reach);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::connection::{Connection, ConnectionStore};
    use crate::time::Resolution;

    fn ctx(h: f64, min_delay: i64) -> KernelContext {
        KernelContext::from_steps(Resolution::new(h).unwrap(), min_delay, 5).unwrap()
    }

    fn calibrated(ctx: &KernelContext, conns: &ConnectionStore) -> IzhikevichPrenorm {
        let mut n = IzhikevichPrenorm::new(NodeId(0), ctx);
        n.calibrate(conns, ctx).unwrap();
        n
    }

    fn inbound(store: &mut ConnectionStore, n: &mut IzhikevichPrenorm, weight: f64) -> ConnectionId {
        let id = store
            .add(Connection {
                source: NodeId(100 + store.len() as u32),
                target: n.id(),
                weight,
                delay_steps: 1,
                receptor: 0,
            })
            .unwrap();
        n.register_incoming(id);
        id
    }

    #[test]
    fn refuses_to_update_before_calibration() {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(3), &ctx);
        let mut out = Vec::new();
        assert_eq!(
            n.update(0, 0, 1, &ctx, &mut conns, &mut out),
            Err(Error::NotCalibrated(NodeId(3)))
        );
    }

    #[test]
    fn rejects_malformed_step_ranges() {
        let ctx = ctx(1.0, 2);
        let mut conns = ConnectionStore::new();
        let mut n = calibrated(&ctx, &conns);
        let mut out = Vec::new();
        for (from, to) in [(1, 1), (2, 1), (0, 3)] {
            assert!(matches!(
                n.update(0, from, to, &ctx, &mut conns, &mut out),
                Err(Error::InvalidStepRange { .. })
            ));
        }
        assert_eq!(n.state(), &State::default());
    }

    #[test]
    fn one_step_from_rest() {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut n = calibrated(&ctx, &conns);
        let mut out = Vec::new();
        n.update(0, 0, 1, &ctx, &mut conns, &mut out).unwrap();
        assert_relative_eq!(n.state().v, -81.0, epsilon = 1e-12);
        assert_relative_eq!(n.state().u, -0.26, epsilon = 1e-12);
        assert!(out.is_empty());
    }

    #[test]
    fn crossing_resets_and_emits_once() {
        let ctx = ctx(0.1, 3);
        let mut conns = ConnectionStore::new();
        let mut n = calibrated(&ctx, &conns);
        n.set_state(&StateUpdate {
            v_m: Some(40.0),
            u_m: Some(0.0),
        })
        .unwrap();
        let mut out = Vec::new();
        n.update(30, 0, 1, &ctx, &mut conns, &mut out).unwrap();

        assert_eq!(n.state().v, -65.0);
        // u was integrated from v = 40 before the reset
        assert_relative_eq!(n.state().u, 0.1 * 0.02 * 8.0 + 8.0, epsilon = 1e-12);
        assert_eq!(
            out,
            vec![Emission {
                sender: NodeId(0),
                lag: 0,
                stamp: 31
            }]
        );
        assert_relative_eq!(n.archive().last_spike().unwrap(), 3.1, epsilon = 1e-12);
    }

    #[test]
    fn clamps_at_v_min() {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        n.set_params(
            &ParameterUpdate {
                v_min: Some(-70.0),
                ..Default::default()
            },
            &ctx,
        )
        .unwrap();
        n.calibrate(&conns, &ctx).unwrap();
        let mut out = Vec::new();
        n.update(0, 0, 1, &ctx, &mut conns, &mut out).unwrap();
        assert_eq!(n.state().v, -70.0);
    }

    #[test]
    fn spike_input_lands_on_its_lag() {
        let ctx = ctx(1.0, 3);
        let mut conns = ConnectionStore::new();
        let mut n = calibrated(&ctx, &conns);
        let mut reference = n.clone();
        n.handle_spike(&SpikeEvent {
            delay_steps: 2,
            rel_delivery: 2,
            weight: 2.5,
            multiplicity: 2,
        })
        .unwrap();

        let mut out = Vec::new();
        n.update(0, 0, 2, &ctx, &mut conns, &mut out).unwrap();
        reference.update(0, 0, 2, &ctx, &mut conns, &mut out).unwrap();
        assert_eq!(n.state(), reference.state());

        let v_before = n.state().v;
        n.update(0, 2, 3, &ctx, &mut conns, &mut out).unwrap();
        reference.update(0, 2, 3, &ctx, &mut conns, &mut out).unwrap();
        assert_relative_eq!(n.state().v - reference.state().v, 5.0, epsilon = 1e-9);
        assert_ne!(v_before, n.state().v);
    }

    #[test]
    fn current_is_latched_for_the_next_step() {
        let ctx = ctx(1.0, 2);
        let mut conns = ConnectionStore::new();
        let mut n = calibrated(&ctx, &conns);
        n.handle_current(&CurrentEvent {
            delay_steps: 1,
            rel_delivery: 0,
            amplitude: 4.0,
            weight: 0.5,
        })
        .unwrap();

        let mut out = Vec::new();
        n.update(0, 0, 1, &ctx, &mut conns, &mut out).unwrap();
        // not yet applied to v, only latched
        assert_relative_eq!(n.state().v, -81.0, epsilon = 1e-12);
        assert_eq!(n.state().i, 2.0);

        let s = *n.state();
        n.update(0, 1, 2, &ctx, &mut conns, &mut out).unwrap();
        let expected = s.v + (0.04 * s.v * s.v + 5.0 * s.v + 140.0 - s.u + 2.0);
        assert_relative_eq!(n.state().v, expected, epsilon = 1e-9);
        assert_eq!(n.state().i, 0.0);
    }

    #[test]
    fn handlers_reject_non_positive_delays() {
        let ctx = ctx(1.0, 1);
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        let mut e = SpikeEvent::new(0, 1.0);
        e.delay_steps = 0;
        assert_eq!(n.handle_spike(&e), Err(Error::NonPositiveDelay(0)));
        let mut c = CurrentEvent::new(0, 1.0);
        c.delay_steps = -2;
        assert_eq!(n.handle_current(&c), Err(Error::NonPositiveDelay(-2)));
    }

    #[test]
    fn normalization_preserves_proportions() {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        let a = inbound(&mut conns, &mut n, 1.0);
        let b = inbound(&mut conns, &mut n, 3.0);
        n.normalize_incoming(&mut conns, 0).unwrap();
        assert_relative_eq!(conns.weight(a).unwrap(), 7.5, epsilon = 1e-12);
        assert_relative_eq!(conns.weight(b).unwrap(), 22.5, epsilon = 1e-12);
        assert_relative_eq!(n.inc_weight_sum(&conns), 30.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_connection_leaves_weights_untouched() {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        let a = inbound(&mut conns, &mut n, 2.0);
        n.register_incoming(ConnectionId(42));
        assert_eq!(
            n.normalize_incoming(&mut conns, 0),
            Err(Error::MissingIncomingConnection {
                node: NodeId(0),
                connection: ConnectionId(42)
            })
        );
        assert_eq!(conns.weight(a), Some(2.0));
    }

    #[test]
    fn published_scheme_scales_spike_input_by_h() {
        let ctx = ctx(0.5, 1);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        n.set_params(
            &ParameterUpdate {
                consistent_integration: Some(false),
                ..Default::default()
            },
            &ctx,
        )
        .unwrap();
        n.calibrate(&conns, &ctx).unwrap();
        let mut reference = n.clone();
        n.handle_spike(&SpikeEvent::new(0, 10.0)).unwrap();

        let mut out = Vec::new();
        n.update(0, 0, 1, &ctx, &mut conns, &mut out).unwrap();
        reference.update(0, 0, 1, &ctx, &mut conns, &mut out).unwrap();
        assert_relative_eq!(reference.state().v, -72.64, epsilon = 1e-9);
        // 10 would be the unscaled reading
        assert_relative_eq!(n.state().v - reference.state().v, 4.7375, epsilon = 1e-9);
    }

    #[test]
    fn archive_stays_bounded_over_long_runs() {
        let ctx = ctx(1.0, 5);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        n.set_params(
            &ParameterUpdate {
                i_e: Some(40.0),
                ..Default::default()
            },
            &ctx,
        )
        .unwrap();
        n.calibrate(&conns, &ctx).unwrap();

        let mut out = Vec::new();
        for origin in (0..20_000).step_by(5) {
            n.update(origin, 0, 5, &ctx, &mut conns, &mut out).unwrap();
        }
        assert!(out.len() > 500, "only {} spikes", out.len());
        // 5 ms delay + 5 * 20 ms trace span, well under 100 entries at this rate
        assert!(n.archive().len() < 100, "{} archived spikes", n.archive().len());
        let last = n.archive().last_spike().unwrap();
        assert!(n.archive().history(last - 1.0, last).next().is_some());
    }

    #[test]
    fn zero_weight_sum_is_an_error() {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        inbound(&mut conns, &mut n, 0.0);
        n.calibrate(&conns, &ctx).unwrap();
        let mut out = Vec::new();
        assert_eq!(
            n.update(0, 0, 1, &ctx, &mut conns, &mut out),
            Err(Error::DegenerateWeightSum {
                node: NodeId(0),
                step: 0,
                sum: 0.0
            })
        );
    }

    #[test]
    fn calibration_checks_back_references() {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        let stray = conns
            .add(Connection {
                source: NodeId(1),
                target: NodeId(2),
                weight: 1.0,
                delay_steps: 1,
                receptor: 0,
            })
            .unwrap();
        n.register_incoming(stray);
        assert_eq!(
            n.calibrate(&conns, &ctx),
            Err(Error::InvalidIncomingConnection {
                connection: stray,
                expected: NodeId(0),
                found: NodeId(2)
            })
        );
        assert!(!n.is_calibrated());

        n.unregister_incoming(stray);
        n.register_incoming(ConnectionId(42));
        assert!(matches!(
            n.calibrate(&conns, &ctx),
            Err(Error::MissingIncomingConnection { .. })
        ));
    }

    #[test]
    fn rejected_parameters_leave_configuration_untouched() {
        let ctx = ctx(1.0, 4);
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        let before = n.params().clone();
        let err = n.set_params(
            &ParameterUpdate {
                a: Some(0.1),
                norm_period: Some(2.0),
                ..Default::default()
            },
            &ctx,
        );
        assert!(err.is_err());
        assert_eq!(n.params(), &before);
    }

    #[test]
    fn only_receptor_zero_is_accepted() {
        let n = IzhikevichPrenorm::new(NodeId(0), &KernelContext::default());
        assert_eq!(n.accepts_receptor(0), Ok(0));
        assert_eq!(n.accepts_receptor(1), Err(Error::UnknownReceptorType(1)));
    }

    #[test]
    fn status_reports_weight_sum_and_spike_time() {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        inbound(&mut conns, &mut n, 1.5);
        inbound(&mut conns, &mut n, 2.0);
        let status = n.status(&conns, &ctx);
        assert_eq!(status.inc_weight_sum, 3.5);
        assert_eq!(status.t_spike, -1.0);
        assert_eq!(status.params.norm_period, 100.0);

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["V_m"], -65.0);
        assert_eq!(json["norm_value"], 30.0);
        assert_eq!(json["inc_weight_sum"], 3.5);
    }

    #[test]
    fn recorder_samples_every_processed_step() {
        let ctx = ctx(1.0, 3);
        let mut conns = ConnectionStore::new();
        let mut n = IzhikevichPrenorm::new(NodeId(0), &ctx);
        inbound(&mut conns, &mut n, 10.0);
        n.connect_recorder(RecordingSpec::default()).unwrap();
        n.calibrate(&conns, &ctx).unwrap();

        let mut out = Vec::new();
        n.update(6, 0, 3, &ctx, &mut conns, &mut out).unwrap();
        let samples = n.handle_logging_request(&DataLoggingRequest { until: 100 });
        assert_eq!(samples.iter().map(|s| s.step).collect::<Vec<_>>(), vec![6, 7, 8]);
        // no normalization step in 6..9, weights stay at 10
        assert!(samples.iter().all(|s| s.values[2] == 10.0));
        assert_eq!(samples[2].values[0], n.state().v);
    }

    #[test]
    fn init_buffers_drops_pending_input_and_history() {
        let ctx = ctx(0.1, 3);
        let mut conns = ConnectionStore::new();
        let mut n = calibrated(&ctx, &conns);
        let fresh = n.clone();
        n.handle_spike(&SpikeEvent::new(0, 50.0)).unwrap();
        n.init_buffers(&ctx);
        let mut out = Vec::new();
        let mut m = fresh;
        n.update(0, 0, 1, &ctx, &mut conns, &mut out).unwrap();
        m.update(0, 0, 1, &ctx, &mut conns, &mut out).unwrap();
        assert_eq!(n.state(), m.state());

        let mut proto = IzhikevichPrenorm::new(NodeId(9), &ctx);
        proto
            .set_state(&StateUpdate {
                v_m: Some(-70.0),
                u_m: Some(-14.0),
            })
            .unwrap();
        n.init_state(&proto);
        assert_eq!((n.state().v, n.state().u), (-70.0, -14.0));
    }
}
