//! Runtime configuration carried by every evaluation context

use mekako_core::StatError;
use serde::{Deserialize, Serialize};

pub const ENV_ALPHA: &str = "MEKAKO_ALPHA";
pub const ENV_CURVE_POINTS: &str = "MEKAKO_CURVE_POINTS";
pub const ENV_SEED: &str = "MEKAKO_SEED";

/// Upper bound on the density-curve grid
pub const MAX_CURVE_POINTS: usize = 100_000;

/// Statistical defaults shared by all plugins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatConfig {
    /// Significance level used for reject decisions
    pub alpha: f64,
    /// Grid size for density curves
    pub curve_points: usize,
    /// Seed for the simulation generator; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            curve_points: 1000,
            seed: None,
        }
    }
}

impl StatConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_curve_points(mut self, points: usize) -> Self {
        self.curve_points = points;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Read overrides from `MEKAKO_ALPHA`, `MEKAKO_CURVE_POINTS` and `MEKAKO_SEED`
    pub fn from_env() -> Result<Self, StatError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ALPHA) {
            config.alpha = raw.trim().parse().map_err(|_| {
                StatError::parse_error(format!("{}='{}' is not a number", ENV_ALPHA, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_CURVE_POINTS) {
            config.curve_points = raw.trim().parse().map_err(|_| {
                StatError::parse_error(format!("{}='{}' is not a count", ENV_CURVE_POINTS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = Some(raw.trim().parse().map_err(|_| {
                StatError::parse_error(format!("{}='{}' is not a seed", ENV_SEED, raw))
            })?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StatError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(StatError::invalid_argument("config", "alpha", "in (0, 1)", self.alpha));
        }
        if !(2..=MAX_CURVE_POINTS).contains(&self.curve_points) {
            return Err(StatError::invalid_argument(
                "config",
                "curve_points",
                &format!("between 2 and {}", MAX_CURVE_POINTS),
                self.curve_points,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StatConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StatConfig::default());
        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.curve_points, 1000);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StatConfig::from_lookup(lookup(&[
            (ENV_ALPHA, "0.01"),
            (ENV_CURVE_POINTS, " 200 "),
            (ENV_SEED, "42"),
        ]))
        .unwrap();
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.curve_points, 200);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_bad_values() {
        let err = StatConfig::from_lookup(lookup(&[(ENV_ALPHA, "lots")])).unwrap_err();
        assert!(err.is_parse());
        let err = StatConfig::from_lookup(lookup(&[(ENV_ALPHA, "1.5")])).unwrap_err();
        assert!(err.is_domain());
        let err = StatConfig::from_lookup(lookup(&[(ENV_CURVE_POINTS, "1")])).unwrap_err();
        assert!(err.is_domain());
        let err = StatConfig::from_lookup(lookup(&[(ENV_CURVE_POINTS, "4000000000")])).unwrap_err();
        assert!(err.is_domain());
        assert!(err.message.contains("curve_points"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: StatConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.curve_points, 1000);
    }
}
