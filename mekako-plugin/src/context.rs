//! Evaluation Context

use crate::{PluginRegistry, StatConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Evaluation context passed to plugins
///
/// One context per caller. The random generator is the only mutable state
/// and is advanced by commands such as `coin_flip`.
pub struct EvalContext {
    pub config: StatConfig,
    pub registry: Arc<PluginRegistry>,
    pub rng: StdRng,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self::with_config(registry, StatConfig::default())
    }

    /// Build a context whose generator follows `config.seed`
    pub fn with_config(registry: Arc<PluginRegistry>, config: StatConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, registry, rng }
    }

    /// Reseed the generator for reproducible simulations
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_contexts_agree() {
        let registry = Arc::new(PluginRegistry::new());
        let mut a = EvalContext::new(registry.clone()).with_seed(9);
        let mut b = EvalContext::with_config(registry, StatConfig::default().with_seed(9));
        let xs: Vec<u32> = (0..8).map(|_| a.rng.gen_range(0..100)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.rng.gen_range(0..100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_alpha_override() {
        let ctx = EvalContext::new(Arc::new(PluginRegistry::new())).with_alpha(0.01);
        assert_eq!(ctx.alpha(), 0.01);
    }
}
