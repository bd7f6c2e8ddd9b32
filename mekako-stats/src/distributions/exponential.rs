//! Exponential distribution, parameterised by scale (mean)

use super::{check_positive, eval_continuous, ContinuousDistribution, Op};
use crate::special::NumericError;
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exponential {
    scale: f64,
}

impl Exponential {
    pub fn new(scale: f64) -> Result<Self, StatError> {
        check_positive("exponential", "scale", scale)?;
        Ok(Self { scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl ContinuousDistribution for Exponential {
    fn name(&self) -> &'static str {
        "exponential"
    }

    fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        (-x / self.scale).exp() / self.scale
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        -(-x / self.scale).exp_m1()
    }

    fn sf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 1.0;
        }
        (-x / self.scale).exp()
    }

    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn plot_range(&self) -> (f64, f64) {
        (0.0, 5.0 * self.scale)
    }

    fn interior_quantile(&self, p: f64) -> Result<f64, NumericError> {
        Ok(-self.scale * (-p).ln_1p())
    }
}

static EXP_PARAMS: [(&str, Option<f64>); 1] = [("scale", Some(1.0))];

fn build(params: &[f64]) -> Result<Exponential, StatError> {
    Exponential::new(params[0])
}

static EXP_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("x", "Number", "Value"),
    ArgMeta::optional("scale", "Number", "Scale = 1/rate (must be > 0)", "1"),
];

static EXP_INV_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("p", "Number", "Probability in [0, 1]"),
    ArgMeta::optional("scale", "Number", "Scale = 1/rate (must be > 0)", "1"),
];

static EXP_RELATED: [&str; 3] = ["exp_pdf", "exp_cdf", "exp_inv"];

pub struct ExpPdf;

static EXP_PDF_EXAMPLES: [&str; 1] = ["exp_pdf(1, 2) → 0.3032..."];

impl FunctionPlugin for ExpPdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "exp_pdf",
            description: "Exponential probability density",
            usage: "exp_pdf(x, [scale])",
            args: &EXP_ARGS,
            returns: "Number",
            examples: &EXP_PDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &EXP_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("exp_pdf", args, &EXP_PARAMS, build, Op::Pdf)
    }
}

pub struct ExpCdf;

static EXP_CDF_EXAMPLES: [&str; 1] = ["exp_cdf(1, 1) → 0.6321..."];

impl FunctionPlugin for ExpCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "exp_cdf",
            description: "Exponential cumulative distribution",
            usage: "exp_cdf(x, [scale])",
            args: &EXP_ARGS,
            returns: "Number",
            examples: &EXP_CDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &EXP_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("exp_cdf", args, &EXP_PARAMS, build, Op::Cdf)
    }
}

pub struct ExpInv;

static EXP_INV_EXAMPLES: [&str; 1] = ["exp_inv(0.5, 1) → 0.6931..."];

impl FunctionPlugin for ExpInv {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "exp_inv",
            description: "Exponential quantile (inverse CDF)",
            usage: "exp_inv(p, [scale])",
            args: &EXP_INV_ARGS,
            returns: "Number",
            examples: &EXP_INV_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &EXP_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("exp_inv", args, &EXP_PARAMS, build, Op::Inv)
    }
}
