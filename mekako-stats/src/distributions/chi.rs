//! Chi-squared distribution, a gamma with shape k/2 and scale 2

use super::{check_positive, eval_continuous, ContinuousDistribution, Gamma, Op};
use mekako_core::StatError;
use mekako_plugin::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquared {
    df: f64,
}

impl ChiSquared {
    pub fn new(df: f64) -> Result<Self, StatError> {
        check_positive("chi2", "df", df)?;
        Ok(Self { df })
    }

    pub fn df(&self) -> f64 {
        self.df
    }

    fn gamma(&self) -> Gamma {
        Gamma::from_validated(self.df / 2.0, 2.0)
    }
}

impl ContinuousDistribution for ChiSquared {
    fn name(&self) -> &'static str {
        "chi2"
    }

    fn pdf(&self, x: f64) -> f64 {
        self.gamma().pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.gamma().cdf(x)
    }

    fn sf(&self, x: f64) -> f64 {
        self.gamma().sf(x)
    }

    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn plot_range(&self) -> (f64, f64) {
        (0.0, (2.0 * self.df).max(5.0))
    }
}

static CHI_PARAMS: [(&str, Option<f64>); 1] = [("df", None)];

fn build(params: &[f64]) -> Result<ChiSquared, StatError> {
    ChiSquared::new(params[0])
}

// ============ Chi-squared PDF ============

pub struct ChiPdf;

static CHI_PDF_ARGS: [ArgMeta; 2] = [
    ArgMeta {
        name: "x",
        typ: "Number",
        description: "Value (must be ≥ 0 for non-zero density)",
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

static CHI_PDF_EXAMPLES: [&str; 1] = ["chi_pdf(2, 3) → 0.2075..."];

static CHI_PDF_RELATED: [&str; 2] = ["chi_cdf", "chi_test"];

impl FunctionPlugin for ChiPdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "chi_pdf",
            description: "Chi-squared distribution PDF",
            usage: "chi_pdf(x, df)",
            args: &CHI_PDF_ARGS,
            returns: "Number",
            examples: &CHI_PDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &CHI_PDF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("chi_pdf", args, &CHI_PARAMS, build, Op::Pdf)
    }
}

// ============ Chi-squared CDF ============

pub struct ChiCdf;

static CHI_CDF_EXAMPLES: [&str; 1] = ["chi_cdf(3.84, 1) → 0.95..."];

static CHI_CDF_RELATED: [&str; 2] = ["chi_pdf", "chi_inv"];

impl FunctionPlugin for ChiCdf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "chi_cdf",
            description: "Chi-squared distribution CDF",
            usage: "chi_cdf(x, df)",
            args: &CHI_PDF_ARGS,
            returns: "Number",
            examples: &CHI_CDF_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &CHI_CDF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("chi_cdf", args, &CHI_PARAMS, build, Op::Cdf)
    }
}

// ============ Chi-squared Inverse ============

pub struct ChiInv;

static CHI_INV_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("p", "Number", "Probability in [0, 1]"),
    ArgMeta::required("df", "Number", "Degrees of freedom (must be > 0)"),
];

static CHI_INV_EXAMPLES: [&str; 1] = ["chi_inv(0.95, 1) → 3.841..."];

static CHI_INV_RELATED: [&str; 2] = ["chi_cdf", "chi_test"];

impl FunctionPlugin for ChiInv {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "chi_inv",
            description: "Chi-squared distribution inverse (quantile)",
            usage: "chi_inv(p, df)",
            args: &CHI_INV_ARGS,
            returns: "Number",
            examples: &CHI_INV_EXAMPLES,
            category: "stats/distribution",
            source: None,
            related: &CHI_INV_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        eval_continuous("chi_inv", args, &CHI_PARAMS, build, Op::Inv)
    }
}
