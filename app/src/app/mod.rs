use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use prenorm::{
    KernelContext, Network, NodeId, ParameterUpdate, Recordable, RecordingSpec,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::app::drive::PoissonDrive;

pub mod drive;

/// One normalizing target unit fed by Poisson-driven input units.
#[derive(Debug, Parser)]
#[command(name = "prenorm-sim", version)]
pub struct Args {
    /// Number of input units
    #[arg(long, default_value_t = 100)]
    pub inputs: usize,
    /// Poisson rate driving each input unit (Hz)
    #[arg(long, default_value_t = 10_000.0)]
    pub rate_hz: f64,
    /// Weight of the Poisson input onto each input unit
    #[arg(long, default_value_t = 2.5)]
    pub drive_weight: f64,
    /// Initial weight of input -> target connections
    #[arg(long, default_value_t = 2.5)]
    pub weight: f64,
    #[arg(long, default_value_t = 250.0)]
    pub norm_value: f64,
    #[arg(long, default_value_t = 150.0)]
    pub norm_period_ms: f64,
    #[arg(long, default_value_t = 1000.0)]
    pub sim_ms: f64,
    #[arg(long, default_value_t = 0.1)]
    pub resolution_ms: f64,
    #[arg(long, default_value_t = 0.1)]
    pub min_delay_ms: f64,
    #[arg(long, default_value_t = 5.0)]
    pub max_delay_ms: f64,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// JSON parameter update applied to the target unit
    #[arg(long)]
    pub params: Option<PathBuf>,
    /// Write the network topology as Graphviz DOT
    #[arg(long)]
    pub dot: Option<PathBuf>,
}

pub struct Report {
    pub steps: u64,
    pub target_spikes: usize,
    pub input_spikes: usize,
    pub drive_spikes: u64,
    pub weight_sum: Vec<(u64, f64)>,
    pub h_ms: f64,
}

impl Report {
    pub fn print(&self) {
        println!("simulated {:.1} ms", self.steps as f64 * self.h_ms);
        println!("drive spikes:  {}", self.drive_spikes);
        println!("input spikes:  {}", self.input_spikes);
        println!("target spikes: {}", self.target_spikes);
        let (min, max) = self
            .weight_sum
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, w)| {
                (lo.min(w), hi.max(w))
            });
        if let Some(&(_, last)) = self.weight_sum.last() {
            println!("inc_weight_sum: last {last:.3}, min {min:.3}, max {max:.3}");
        }
    }
}

pub struct App {
    network: Network,
    target: NodeId,
    inputs: Vec<NodeId>,
    drive: PoissonDrive,
    rng: StdRng,
    sim_steps: u64,
}

impl App {
    pub fn new(args: &Args) -> anyhow::Result<Self> {
        anyhow::ensure!(
            args.rate_hz.is_finite(),
            "--rate-hz must be finite, got {}",
            args.rate_hz
        );
        let ctx = KernelContext::new(args.resolution_ms, args.min_delay_ms, args.max_delay_ms)?;
        let mut rng = StdRng::seed_from_u64(args.seed);
        let mut network = Network::new(ctx);

        let target = network.add_node();
        let inputs = network.add_nodes(args.inputs);

        network.set_params(
            target,
            &ParameterUpdate {
                norm_value: Some(args.norm_value),
                norm_period: Some(args.norm_period_ms),
                ..Default::default()
            },
        )?;
        if let Some(path) = &args.params {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let update: ParameterUpdate = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            network.set_params(target, &update)?;
        }

        network.connect_fixed_indegree(
            &mut rng,
            &inputs,
            &[target],
            inputs.len(),
            args.weight,
            ctx.min_delay..=ctx.max_delay,
            false,
        )?;
        network.connect_recorder(
            target,
            RecordingSpec {
                record_from: vec![Recordable::IncWeightSum],
                interval: 1,
            },
        )?;

        info!(
            inputs = inputs.len(),
            connections = network.connections().len(),
            min_delay = ctx.min_delay,
            max_delay = ctx.max_delay,
            "network built"
        );

        Ok(Self {
            network,
            target,
            inputs,
            drive: PoissonDrive::new(args.rate_hz, ctx.resolution.ms(), args.drive_weight),
            rng,
            sim_steps: ctx.resolution.ms_to_steps(args.sim_ms).max(0) as u64,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn run(&mut self) -> anyhow::Result<Report> {
        let interval = self.network.ctx().min_delay;
        let mut drive_spikes = 0;
        let mut weight_sum = Vec::new();

        while self.network.time_steps() < self.sim_steps {
            let from = self.network.time_steps();
            drive_spikes += self.drive.inject(
                &mut self.rng,
                &mut self.network,
                &self.inputs,
                from,
                from + interval,
            )?;
            self.network.simulate(interval)?;
            weight_sum.extend(
                self.network
                    .collect_samples(self.target)?
                    .into_iter()
                    .map(|s| (s.step, s.values[0])),
            );
        }

        let target_spikes = self
            .network
            .spikes()
            .iter()
            .filter(|s| s.node == self.target)
            .count();
        info!(target_spikes, "simulation finished");

        Ok(Report {
            steps: self.network.time_steps(),
            target_spikes,
            input_spikes: self.network.spikes().len() - target_spikes,
            drive_spikes,
            weight_sum,
            h_ms: self.network.ctx().resolution.ms(),
        })
    }
}
