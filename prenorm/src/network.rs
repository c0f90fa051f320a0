//! Minimal sequential driver: owns the units and their connections, runs the
//! simulation in delivery intervals of `min_delay` steps and routes spikes.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::index;

use crate::connection::{Connection, ConnectionId, ConnectionStore, NodeId};
use crate::error::{Error, Result};
use crate::event::{CurrentEvent, Emission, SpikeEvent};
use crate::neuron::{IzhikevichPrenorm, Status};
use crate::params::ParameterUpdate;
use crate::recorder::{DataLoggingRequest, RecordingSpec, Sample};
use crate::state::StateUpdate;
use crate::time::KernelContext;

/// One spike seen by the network, in steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpikeRecord {
    pub node: NodeId,
    pub stamp: u64,
}

#[derive(Debug, Clone, Copy)]
enum Injection {
    Spike { target: NodeId, step: u64, weight: f64, multiplicity: u32 },
    Current { target: NodeId, step: u64, amplitude: f64 },
}

impl Injection {
    fn step(&self) -> u64 {
        match *self {
            Self::Spike { step, .. } | Self::Current { step, .. } => step,
        }
    }
}

pub struct Network {
    ctx: KernelContext,
    nodes: Vec<IzhikevichPrenorm>,
    connections: ConnectionStore,

    // ----------------------- CSR outgoing index
    /// Connections of source i are out_conn[out_offset[i]..out_offset[i+1]]
    out_offset: Vec<u32>,
    out_conn: Vec<ConnectionId>,
    prepared: bool,

    // ----------------------- Simulation state
    /// First step of the next delivery interval
    origin: u64,
    pending: Vec<Injection>,
    spikes: Vec<SpikeRecord>,
}

impl Network {
    pub fn new(ctx: KernelContext) -> Self {
        Self {
            ctx,
            nodes: Vec::new(),
            connections: ConnectionStore::new(),
            out_offset: vec![0],
            out_conn: Vec::new(),
            prepared: false,
            origin: 0,
            pending: Vec::new(),
            spikes: Vec::new(),
        }
    }

    pub fn ctx(&self) -> &KernelContext {
        &self.ctx
    }

    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(IzhikevichPrenorm::new(id, &self.ctx));
        self.prepared = false;
        id
    }

    pub fn add_nodes(&mut self, n: usize) -> Vec<NodeId> {
        (0..n).map(|_| self.add_node()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Result<&IzhikevichPrenorm> {
        self.nodes.get(id.0 as usize).ok_or(Error::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut IzhikevichPrenorm> {
        self.nodes.get_mut(id.0 as usize).ok_or(Error::UnknownNode(id))
    }

    pub fn nodes(&self) -> &[IzhikevichPrenorm] {
        &self.nodes
    }

    pub fn connections(&self) -> &ConnectionStore {
        &self.connections
    }

    /// Topology edits that bypass [`Self::connect`]; only for tests and tools
    /// that need to build inconsistent networks on purpose.
    pub fn connections_mut(&mut self) -> &mut ConnectionStore {
        self.prepared = false;
        &mut self.connections
    }

    pub fn register_incoming(&mut self, node: NodeId, connection: ConnectionId) -> Result<bool> {
        self.prepared = false;
        Ok(self.node_mut(node)?.register_incoming(connection))
    }

    pub fn set_params(&mut self, id: NodeId, update: &ParameterUpdate) -> Result<()> {
        let ctx = self.ctx;
        self.node_mut(id)?.set_params(update, &ctx)?;
        self.prepared = false;
        Ok(())
    }

    pub fn set_state(&mut self, id: NodeId, update: &StateUpdate) -> Result<()> {
        self.node_mut(id)?.set_state(update)
    }

    pub fn status(&self, id: NodeId) -> Result<Status> {
        Ok(self.node(id)?.status(&self.connections, &self.ctx))
    }

    pub fn spikes(&self) -> &[SpikeRecord] {
        &self.spikes
    }

    /// Steps simulated so far.
    pub fn time_steps(&self) -> u64 {
        self.origin
    }

    // ----------------------- Topology

    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: f64,
        delay_steps: u64,
    ) -> Result<ConnectionId> {
        self.node(source)?;
        let receptor = self.node(target)?.accepts_receptor(0)?;
        if delay_steps < self.ctx.min_delay || delay_steps > self.ctx.max_delay {
            return Err(Error::bad_parameter(
                "delay",
                format!(
                    "must lie within [{}, {}] steps, got {delay_steps}",
                    self.ctx.min_delay, self.ctx.max_delay
                ),
            ));
        }
        let id = self.connections.add(Connection {
            source,
            target,
            weight,
            delay_steps,
            receptor,
        })?;
        self.node_mut(target)?.register_incoming(id);
        self.prepared = false;
        Ok(id)
    }

    /// Give every target exactly `indegree` incoming connections from randomly
    /// chosen, distinct `sources`, with delays drawn uniformly from `delay`.
    #[allow(clippy::too_many_arguments)]
    pub fn connect_fixed_indegree<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        sources: &[NodeId],
        targets: &[NodeId],
        indegree: usize,
        weight: f64,
        delay: RangeInclusive<u64>,
        autapses: bool,
    ) -> Result<()> {
        for &target in targets {
            let candidates: Vec<NodeId> = sources
                .iter()
                .copied()
                .filter(|&s| autapses || s != target)
                .collect();
            if indegree > candidates.len() {
                return Err(Error::bad_parameter(
                    "indegree",
                    format!("{indegree} exceeds the {} available sources", candidates.len()),
                ));
            }
            for i in index::sample(&mut *rng, candidates.len(), indegree) {
                let d = rng.random_range(delay.clone());
                self.connect(candidates[i], target, weight, d)?;
            }
        }
        Ok(())
    }

    // ----------------------- Recording and external input

    pub fn connect_recorder(&mut self, id: NodeId, spec: RecordingSpec) -> Result<()> {
        self.node_mut(id)?.connect_recorder(spec)
    }

    /// Samples recorded for `id` since the last request.
    pub fn collect_samples(&mut self, id: NodeId) -> Result<Vec<Sample>> {
        let request = DataLoggingRequest { until: self.origin };
        Ok(self.node_mut(id)?.handle_logging_request(&request))
    }

    /// Spike arriving at `target` so that it enters the update of `step`.
    pub fn inject_spike(&mut self, target: NodeId, step: u64, weight: f64, multiplicity: u32) -> Result<()> {
        self.check_injection(target, step)?;
        self.pending.push(Injection::Spike {
            target,
            step,
            weight,
            multiplicity,
        });
        Ok(())
    }

    /// Current that becomes the forcing term of the step after `step`.
    pub fn inject_current(&mut self, target: NodeId, step: u64, amplitude: f64) -> Result<()> {
        self.check_injection(target, step)?;
        self.pending.push(Injection::Current {
            target,
            step,
            amplitude,
        });
        Ok(())
    }

    fn check_injection(&self, target: NodeId, step: u64) -> Result<()> {
        self.node(target)?;
        if step < self.origin {
            return Err(Error::NonPositiveDelay(step as i64 - self.origin as i64));
        }
        Ok(())
    }

    // ----------------------- Simulation

    /// Build the outgoing index and calibrate every unit.
    pub fn prepare(&mut self) -> Result<()> {
        let n = self.nodes.len();

        // CSR prefix over sources
        let mut out_offset = vec![0u32; n + 1];
        for (_, c) in self.connections.iter() {
            out_offset[c.source.0 as usize + 1] += 1;
        }
        for i in 0..n {
            out_offset[i + 1] += out_offset[i];
        }
        let mut fill: Vec<u32> = out_offset[..n].to_vec();
        let mut out_conn = vec![ConnectionId(0); self.connections.len()];
        for (id, c) in self.connections.iter() {
            let slot = &mut fill[c.source.0 as usize];
            out_conn[*slot as usize] = id;
            *slot += 1;
        }
        self.out_offset = out_offset;
        self.out_conn = out_conn;

        for node in &mut self.nodes {
            node.calibrate(&self.connections, &self.ctx)?;
        }
        self.prepared = true;
        Ok(())
    }

    /// Simulate at least `steps` steps, rounded up to whole delivery intervals.
    ///
    /// Units are updated one after another. Each unit is the only writer of the
    /// weights of its incoming connections; senders read those weights only
    /// when routing, after every unit finished the interval.
    pub fn simulate(&mut self, steps: u64) -> Result<()> {
        if !self.prepared || self.nodes.iter().any(|n| !n.is_calibrated()) {
            self.prepare()?;
        }
        let ctx = self.ctx;
        let intervals = steps.div_ceil(ctx.min_delay);
        let mut emitted: Vec<Emission> = Vec::new();

        for _ in 0..intervals {
            let origin = self.origin;
            for node in &mut self.nodes {
                node.begin_interval(origin);
            }
            self.deliver_injections(origin)?;

            emitted.clear();
            for node in &mut self.nodes {
                node.update(origin, 0, ctx.min_delay, &ctx, &mut self.connections, &mut emitted)?;
            }

            self.origin += ctx.min_delay;
            let next = self.origin;
            for node in &mut self.nodes {
                node.begin_interval(next);
            }
            for e in &emitted {
                self.route(e, next)?;
                self.spikes.push(SpikeRecord {
                    node: e.sender,
                    stamp: e.stamp,
                });
            }
        }
        Ok(())
    }

    fn deliver_injections(&mut self, origin: u64) -> Result<()> {
        let end = origin + self.ctx.min_delay;
        let (due, later): (Vec<Injection>, Vec<Injection>) =
            self.pending.drain(..).partition(|inj| inj.step() < end);
        self.pending = later;
        for inj in due {
            match inj {
                Injection::Spike {
                    target,
                    step,
                    weight,
                    multiplicity,
                } => self.node_mut(target)?.handle_spike(&SpikeEvent {
                    delay_steps: 1,
                    rel_delivery: step - origin,
                    weight,
                    multiplicity,
                })?,
                Injection::Current {
                    target,
                    step,
                    amplitude,
                } => self
                    .node_mut(target)?
                    .handle_current(&CurrentEvent::new(step - origin, amplitude))?,
            }
        }
        Ok(())
    }

    /// Hand one emitted spike to every outgoing connection of its sender.
    fn route(&mut self, e: &Emission, next_origin: u64) -> Result<()> {
        let src = e.sender.0 as usize;
        let start = self.out_offset[src] as usize;
        let end = self.out_offset[src + 1] as usize;
        // the crossing happened during step stamp - 1
        let t = e.stamp - 1;
        for j in start..end {
            let Some(c) = self.connections.get(self.out_conn[j]) else {
                continue;
            };
            let event = SpikeEvent {
                delay_steps: c.delay_steps as i64,
                rel_delivery: t + c.delay_steps - next_origin,
                weight: c.weight,
                multiplicity: 1,
            };
            let target = c.target;
            self.node_mut(target)?.handle_spike(&event)?;
        }
        Ok(())
    }
}
