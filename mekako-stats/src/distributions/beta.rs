//! Beta distribution on [0, 1]

use super::{check_positive, eval_continuous, ContinuousDistribution, Op};
use crate::special::{beta_i, ln_beta};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beta {
    a: f64,
    b: f64,
}

impl Beta {
    pub fn new(a: f64, b: f64) -> Result<Self, StatError> {
        check_positive("beta", "a", a)?;
        check_positive("beta", "b", b)?;
        Ok(Self { a, b })
    }
}

/// Density contribution of an endpoint with exponent `shape - 1`
fn endpoint_density(shape: f64, other: f64) -> f64 {
    if shape < 1.0 {
        f64::INFINITY
    } else if shape == 1.0 {
        // Beta(1, b) at 0 is b, Beta(a, 1) at 1 is a
        other
    } else {
        0.0
    }
}

impl ContinuousDistribution for Beta {
    fn name(&self) -> &'static str {
        "beta"
    }

    fn pdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        if x == 0.0 {
            return endpoint_density(self.a, self.b);
        }
        if x == 1.0 {
            return endpoint_density(self.b, self.a);
        }
        ((self.a - 1.0) * x.ln() + (self.b - 1.0) * (-x).ln_1p() - ln_beta(self.a, self.b)).exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        beta_i(self.a, self.b, x)
    }

    fn sf(&self, x: f64) -> f64 {
        beta_i(self.b, self.a, 1.0 - x)
    }

    fn support(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn plot_range(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

static BETA_PARAMS: [(&str, Option<f64>); 2] = [("a", None), ("b", None)];

fn build(params: &[f64]) -> Result<Beta, StatError> {
    Beta::new(params[0], params[1])
}

static BETA_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("x", "Number", "Value in [0, 1] (or probability for beta_inv)"),
    ArgMeta::required("a", "Number", "First shape parameter (must be > 0)"),
    ArgMeta::required("b", "Number", "Second shape parameter (must be > 0)"),
];

static BETA_RELATED: [&str; 3] = ["beta_pdf", "beta_cdf", "beta_inv"];

pub struct BetaPdf;

impl FunctionPlugin for BetaPdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "beta_pdf",
            description: "Beta probability density",
            usage: "beta_pdf(x, a, b)",
            args: &BETA_ARGS,
            returns: "Number",
            examples: &["beta_pdf(0.5, 2, 2) → 1.5"],
            category: "stats/distribution",
            source: None,
            related: &BETA_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("beta_pdf", args, &BETA_PARAMS, build, Op::Pdf)
    }
}

pub struct BetaCdf;

impl FunctionPlugin for BetaCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "beta_cdf",
            description: "Beta cumulative distribution",
            usage: "beta_cdf(x, a, b)",
            args: &BETA_ARGS,
            returns: "Number",
            examples: &["beta_cdf(0.5, 2, 2) → 0.5"],
            category: "stats/distribution",
            source: None,
            related: &BETA_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("beta_cdf", args, &BETA_PARAMS, build, Op::Cdf)
    }
}

pub struct BetaInv;

impl FunctionPlugin for BetaInv {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "beta_inv",
            description: "Beta quantile (inverse CDF)",
            usage: "beta_inv(p, a, b)",
            args: &BETA_ARGS,
            returns: "Number",
            examples: &["beta_inv(0.5, 2, 2) → 0.5"],
            category: "stats/distribution",
            source: None,
            related: &BETA_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("beta_inv", args, &BETA_PARAMS, build, Op::Inv)
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
    fn test_pdf_values() {
        let d = Beta::new(2.0, 2.0).unwrap();
        assert!((d.pdf(0.5) - 1.5).abs() < 1e-12);
        assert_eq!(d.pdf(1.5), 0.0);
        assert_eq!(d.pdf(0.0), 0.0);
    }

    #[test]
    fn test_pdf_endpoints() {
        assert_eq!(Beta::new(0.5, 0.5).unwrap().pdf(0.0), f64::INFINITY);
        assert_eq!(Beta::new(0.5, 0.5).unwrap().pdf(1.0), f64::INFINITY);
        assert_eq!(Beta::new(1.0, 3.0).unwrap().pdf(0.0), 3.0);
        assert_eq!(Beta::new(4.0, 1.0).unwrap().pdf(1.0), 4.0);
    }

    #[test]
    fn test_cdf_and_quantile() {
        let d = Beta::new(2.0, 2.0).unwrap();
        assert!((d.cdf(0.5) - 0.5).abs() < 1e-12);
        // 3x² - 2x³ at 0.25
        assert!((d.cdf(0.25) - 0.156_25).abs() < 1e-12);
        assert!((d.quantile(0.5).unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(d.quantile(1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_plugin() {
        let args = vec![Value::Number(0.5), Value::Number(2.0), Value::Number(2.0)];
        let result = BetaPdf.call(&args, &eval_ctx());
        assert!((result.as_number().unwrap() - 1.5).abs() < 1e-12);
        let bad = vec![Value::Number(0.5), Value::Number(-2.0), Value::Number(2.0)];
        assert!(BetaCdf.call(&bad, &eval_ctx()).as_error().unwrap().is_domain());
    }
}
