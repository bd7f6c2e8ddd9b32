//! Normal distribution

use super::{check_finite, check_positive, eval_continuous, ContinuousDistribution, Op};
use crate::special::{erfc, erfc_inv, NumericError};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normal {
    mean: f64,
    std: f64,
}

impl Normal {
    pub fn new(mean: f64, std: f64) -> Result<Self, StatError> {
        check_finite("normal", "mean", mean)?;
        check_positive("normal", "std", std)?;
        Ok(Self { mean, std })
    }

    pub fn standard() -> Self {
        Self { mean: 0.0, std: 1.0 }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }
}

impl ContinuousDistribution for Normal {
    fn name(&self) -> &'static str {
        "normal"
    }

    fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std;
        (-0.5 * z * z).exp() / (self.std * (2.0 * PI).sqrt())
    }

    fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std;
        0.5 * erfc(-z / SQRT_2)
    }

    fn sf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std;
        0.5 * erfc(z / SQRT_2)
    }

    fn support(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }

    fn plot_range(&self) -> (f64, f64) {
        (self.mean - 4.0 * self.std, self.mean + 4.0 * self.std)
    }

    fn interior_quantile(&self, p: f64) -> Result<f64, NumericError> {
        Ok(self.mean - self.std * SQRT_2 * erfc_inv(2.0 * p))
    }
}

static NORMAL_PARAMS: [(&str, Option<f64>); 2] = [("mean", Some(0.0)), ("std", Some(1.0))];

fn build(params: &[f64]) -> Result<Normal, StatError> {
    Normal::new(params[0], params[1])
}

// ============ Normal PDF ============

pub struct NormPdf;

static NORM_PDF_ARGS: [ArgMeta; 3] = [
    ArgMeta {
        name: "x",
        typ: "Number",
        description: "Value",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "mean",
        typ: "Number",
        description: "Mean",
        optional: true,
        default: Some("0"),
    },
    ArgMeta {
        name: "std",
        typ: "Number",
        description: "Standard deviation (must be > 0)",
        optional: true,
        default: Some("1"),
    },
];

static NORM_PDF_EXAMPLES: [&str; 2] = ["norm_pdf(0) → 0.3989...", "norm_pdf(100, 100, 15) → 0.0266..."];

static NORM_PDF_RELATED: [&str; 2] = ["norm_cdf", "norm_inv"];

impl FunctionPlugin for NormPdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "norm_pdf",
            description: "Normal distribution probability density",
            usage: "norm_pdf(x, [mean], [std])",
            args: &NORM_PDF_ARGS,
            returns: "Number",
            examples: &NORM_PDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &NORM_PDF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("norm_pdf", args, &NORMAL_PARAMS, build, Op::Pdf)
    }
}

// ============ Normal CDF ============

pub struct NormCdf;

static NORM_CDF_EXAMPLES: [&str; 2] = ["norm_cdf(1.96) → 0.975...", "norm_cdf(0, 0, 1) → 0.5"];

static NORM_CDF_RELATED: [&str; 2] = ["norm_pdf", "norm_inv"];

impl FunctionPlugin for NormCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "norm_cdf",
            description: "Normal cumulative distribution P(X ≤ x)",
            usage: "norm_cdf(x, [mean], [std])",
            args: &NORM_PDF_ARGS,
            returns: "Number",
            examples: &NORM_CDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &NORM_CDF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("norm_cdf", args, &NORMAL_PARAMS, build, Op::Cdf)
    }
}

// ============ Normal Inverse ============

pub struct NormInv;

static NORM_INV_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("p", "Number", "Probability in [0, 1]"),
    ArgMeta::optional("mean", "Number", "Mean", "0"),
    ArgMeta::optional("std", "Number", "Standard deviation (must be > 0)", "1"),
];

static NORM_INV_EXAMPLES: [&str; 2] = ["norm_inv(0.975) → 1.959964...", "norm_inv(0.5, 100, 15) → 100"];

static NORM_INV_RELATED: [&str; 2] = ["norm_cdf", "t_inv"];

impl FunctionPlugin for NormInv {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "norm_inv",
            description: "Normal quantile (inverse CDF)",
            usage: "norm_inv(p, [mean], [std])",
            args: &NORM_INV_ARGS,
            returns: "Number",
            examples: &NORM_INV_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &NORM_INV_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("norm_inv", args, &NORMAL_PARAMS, build, Op::Inv)
    }
}
