use prenorm::{Network, NodeId};
use rand::Rng;

/// Poisson spike input, approximated per step: `floor(lambda)` spikes plus one
/// more with probability `frac(lambda)`, where `lambda = rate * h`.
pub struct PoissonDrive {
    lambda: f64,
    weight: f64,
}

impl PoissonDrive {
    pub fn new(rate_hz: f64, h_ms: f64, weight: f64) -> Self {
        Self {
            lambda: (rate_hz * h_ms / 1000.0).max(0.0),
            weight,
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let whole = self.lambda.floor();
        let frac = self.lambda - whole;
        whole as u32 + u32::from(rng.random_bool(frac))
    }

    /// Queue input for every target over steps `[from, to)`.
    pub fn inject<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        network: &mut Network,
        targets: &[NodeId],
        from: u64,
        to: u64,
    ) -> prenorm::Result<u64> {
        let mut total = 0u64;
        for &target in targets {
            for step in from..to {
                let n = self.draw(rng);
                if n > 0 {
                    network.inject_spike(target, step, self.weight, n)?;
                    total += n as u64;
                }
            }
        }
        Ok(total)
    }
}
