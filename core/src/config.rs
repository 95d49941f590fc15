use crate::{Error, Result};
use serde::Deserialize;

/// Parameters of the link-graph ranking loop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Probability that the surfer follows a link rather than jumping to a random page.
    pub decay: f64,
    /// Iteration stops once no score moves by more than this.
    pub epsilon: f64,
    /// Upper bound on iterations; `0` returns the uniform prior.
    pub limit: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self { decay: 0.85, epsilon: 1e-4, limit: 100 }
    }
}

impl RankConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.decay) {
            return Err(Error::invalid(format!("decay must be within [0, 1], got {}", self.decay)));
        }
        if !(self.epsilon >= 0.0) {
            return Err(Error::invalid(format!("epsilon must be non-negative, got {}", self.epsilon)));
        }
        Ok(())
    }
}
