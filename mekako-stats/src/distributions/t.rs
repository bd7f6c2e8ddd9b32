//! Student's t distribution

use super::{check_positive, eval_continuous, ContinuousDistribution, Op};
use crate::special::{beta_i, ln_gamma};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentT {
    df: f64,
}

impl StudentT {
    pub fn new(df: f64) -> Result<Self, StatError> {
        check_positive("t", "df", df)?;
        Ok(Self { df })
    }

    pub fn df(&self) -> f64 {
        self.df
    }

    /// Two-sided tail probability P(|T| ≥ |t|)
    pub fn two_sided_p(&self, t: f64) -> f64 {
        (2.0 * self.sf(t.abs())).min(1.0)
    }

    /// Half of I_{ν/(ν+x²)}(ν/2, 1/2), the tail mass beyond |x|
    fn tail(&self, x: f64) -> f64 {
        let nu = self.df;
        0.5 * beta_i(nu / 2.0, 0.5, nu / (nu + x * x))
    }
}

impl ContinuousDistribution for StudentT {
    fn name(&self) -> &'static str {
        "t"
    }

    fn pdf(&self, x: f64) -> f64 {
        // Γ((ν+1)/2) / (√(νπ) Γ(ν/2)) · (1 + x²/ν)^(-(ν+1)/2)
        let nu = self.df;
        let coef = ln_gamma((nu + 1.0) / 2.0) - ln_gamma(nu / 2.0) - 0.5 * (nu * PI).ln();
        (coef - (nu + 1.0) / 2.0 * (x * x / nu).ln_1p()).exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x > 0.0 {
            1.0 - self.tail(x)
        } else {
            self.tail(x)
        }
    }

    fn sf(&self, x: f64) -> f64 {
        if x > 0.0 {
            self.tail(x)
        } else {
            1.0 - self.tail(x)
        }
    }

    fn support(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }

    fn plot_range(&self) -> (f64, f64) {
        (-4.0, 4.0)
    }
}

static T_PARAMS: [(&str, Option<f64>); 1] = [("df", None)];

fn build(params: &[f64]) -> Result<StudentT, StatError> {
    StudentT::new(params[0])
}

// ============ T PDF ============

pub struct TPdf;

static T_PDF_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "x",
        typ: "Number",
        description: "Value",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "df",
        typ: "Number",
        description: "Degrees of freedom (must be > 0)",
        optional: false,
        default: None,
    },
];

static T_PDF_EXAMPLES: [&str; 1] = ["t_pdf(0, 10) → 0.389..."];

static T_PDF_RELATED: [&str; 2] = ["t_cdf", "norm_pdf"];

impl FunctionPlugin for TPdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_pdf",
            description: "Student's t distribution PDF",
            usage: "t_pdf(x, df)",
            args: &T_PDF_ARGS,
            returns: "Number",
            examples: &T_PDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &T_PDF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("t_pdf", args, &T_PARAMS, build, Op::Pdf)
    }
}

// ============ T CDF ============

pub struct TCdf;

static T_CDF_EXAMPLES: [&str; 1] = ["t_cdf(1.96, 30) → 0.97..."];

static T_CDF_RELATED: [&str; 2] = ["t_pdf", "t_inv"];

impl FunctionPlugin for TCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_cdf",
            description: "Student's t distribution CDF",
            usage: "t_cdf(x, df)",
            args: &T_PDF_ARGS,
            returns: "Number",
            examples: &T_CDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &T_CDF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("t_cdf", args, &T_PARAMS, build, Op::Cdf)
    }
}

// ============ T Inverse ============

pub struct TInv;

static T_INV_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "p",
        typ: "Number",
        description: "Probability in [0, 1]",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "df",
        typ: "Number",
        description: "Degrees of freedom (must be > 0)",
        optional: false,
        default: None,
    },
];

static T_INV_EXAMPLES: [&str; 1] = ["t_inv(0.975, 30) → 2.042..."];

static T_INV_RELATED: [&str; 2] = ["t_cdf", "norm_inv"];

impl FunctionPlugin for TInv {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "t_inv",
            description: "Student's t distribution inverse (quantile)",
            usage: "t_inv(p, df)",
            args: &T_INV_ARGS,
            returns: "Number",
            examples: &T_INV_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &T_INV_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("t_inv", args, &T_PARAMS, build, Op::Inv)
    }
}
