//! Continuous uniform distribution on [low, high]

use super::{check_finite, eval_continuous, ContinuousDistribution, Op};
use crate::special::NumericError;
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uniform {
    low: f64,
    high: f64,
}

impl Uniform {
    pub fn new(low: f64, high: f64) -> Result<Self, StatError> {
        check_finite("uniform", "low", low)?;
        check_finite("uniform", "high", high)?;
        if low >= high {
            return Err(StatError::invalid_argument(
                "uniform",
                "high",
                &format!("> low ({})", low),
                high,
            ));
        }
        Ok(Self { low, high })
    }
}

impl ContinuousDistribution for Uniform {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn pdf(&self, x: f64) -> f64 {
        if x < self.low || x > self.high {
            0.0
        } else {
            1.0 / (self.high - self.low)
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        ((x - self.low) / (self.high - self.low)).clamp(0.0, 1.0)
    }

    fn sf(&self, x: f64) -> f64 {
        ((self.high - x) / (self.high - self.low)).clamp(0.0, 1.0)
    }

    fn support(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    fn plot_range(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    fn interior_quantile(&self, p: f64) -> Result<f64, NumericError> {
        Ok(self.low + p * (self.high - self.low))
    }
}

static UNIFORM_PARAMS: [(&str, Option<f64>); 2] = [("low", Some(0.0)), ("high", Some(1.0))];

fn build(params: &[f64]) -> Result<Uniform, StatError> {
    Uniform::new(params[0], params[1])
}

static UNIF_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("x", "Number", "Value (or probability for unif_inv)"),
    ArgMeta::optional("low", "Number", "Lower bound", "0"),
    ArgMeta::optional("high", "Number", "Upper bound (must be > low)", "1"),
];

static UNIF_RELATED: [&str; 3] = ["unif_pdf", "unif_cdf", "unif_inv"];

pub struct UnifPdf;

impl FunctionPlugin for UnifPdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unif_pdf",
            description: "Uniform probability density",
            usage: "unif_pdf(x, [low], [high])",
            args: &UNIF_ARGS,
            returns: "Number",
            examples: &["unif_pdf(0.5, 0, 2) → 0.5"],
            category: "stats/distribution",
            source: None,
            related: &UNIF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("unif_pdf", args, &UNIFORM_PARAMS, build, Op::Pdf)
    }
}

pub struct UnifCdf;

impl FunctionPlugin for UnifCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unif_cdf",
            description: "Uniform cumulative distribution",
            usage: "unif_cdf(x, [low], [high])",
            args: &UNIF_ARGS,
            returns: "Number",
            examples: &["unif_cdf(1.5, 1, 3) → 0.25"],
            category: "stats/distribution",
            source: None,
            related: &UNIF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("unif_cdf", args, &UNIFORM_PARAMS, build, Op::Cdf)
    }
}

pub struct UnifInv;

impl FunctionPlugin for UnifInv {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unif_inv",
            description: "Uniform quantile (inverse CDF)",
            usage: "unif_inv(p, [low], [high])",
            args: &UNIF_ARGS,
            returns: "Number",
            examples: &["unif_inv(0.25, 1, 3) → 1.5"],
            category: "stats/distribution",
            source: None,
            related: &UNIF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("unif_inv", args, &UNIFORM_PARAMS, build, Op::Inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn eval_ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new()))
    }

    #[test]
    fn test_values() {
        let d = Uniform::new(1.0, 3.0).unwrap();
        assert_eq!(d.pdf(2.0), 0.5);
        assert_eq!(d.pdf(3.5), 0.0);
        assert_eq!(d.cdf(1.5), 0.25);
        assert_eq!(d.cdf(0.0), 0.0);
        assert_eq!(d.quantile(0.25).unwrap(), 1.5);
        assert_eq!(d.quantile(1.0).unwrap(), 3.0);
    }

    #[test]
    fn test_low_must_be_below_high() {
        assert!(Uniform::new(2.0, 2.0).unwrap_err().is_domain());
        assert!(Uniform::new(3.0, 1.0).is_err());
    }

    #[test]
    fn test_plugin_defaults() {
        let result = UnifCdf.call(&[Value::Number(0.3)], &eval_ctx());
        assert_eq!(result.as_number(), Some(0.3));
    }
}
